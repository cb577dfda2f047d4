//! CRUD access to one resource collection

use crate::error::{ResourceError, ResourceResult};
use crate::resource::{Entity, Resource, action_path};
use polyglot_http::{ApiError, EntityId};
use polyglot_i18n::EntityDraft;
use polyglot_query::{MutationOptions, MutationOutcome, Query, QueryClient};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::marker::PhantomData;

/// Draft of a record of resource `T`
pub type Draft<T> = EntityDraft<Entity<T>>;

/// Typed CRUD over the collection of resource `T`.
///
/// Reads go through the query cache under [`Resource::CACHE_KEY`]; every
/// successful write invalidates that key (and the resource's dependent keys)
/// so open lists refetch.
pub struct ResourceApi<T> {
	client: QueryClient,
	_marker: PhantomData<fn() -> T>,
}

impl<T> Clone for ResourceApi<T> {
	fn clone(&self) -> Self {
		Self {
			client: self.client.clone(),
			_marker: PhantomData,
		}
	}
}

impl<T> fmt::Debug for ResourceApi<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ResourceApi")
			.field("resource", &std::any::type_name::<T>())
			.finish()
	}
}

impl<T: Resource> ResourceApi<T> {
	/// CRUD for `T` over `client`
	pub fn new(client: QueryClient) -> Self {
		Self {
			client,
			_marker: PhantomData,
		}
	}

	/// The query client requests go through
	pub fn client(&self) -> &QueryClient {
		&self.client
	}

	/// Observer of the whole collection
	pub fn list(&self) -> Query<Vec<Entity<T>>> {
		self.client
			.query(action_path::<T>(T::LIST_ACTION), T::CACHE_KEY)
	}

	/// The collection, from cache when fresh
	pub async fn fetch_all(&self) -> ResourceResult<Vec<Entity<T>>> {
		let data = self
			.client
			.fetch(&action_path::<T>(T::LIST_ACTION), T::CACHE_KEY)
			.await?;
		Ok(decode(data)?)
	}

	/// One record, always from the network
	pub async fn get(&self, id: impl Into<EntityId>) -> ResourceResult<Entity<T>> {
		let id = id.into();
		let path = action_path::<T>(T::GET_ACTION);
		let query = [("id", id.to_string())];
		let api = self.client.api();
		let envelope = self
			.client
			.config()
			.retry
			.run(|| api.get_query(&path, &query))
			.await?;
		match envelope.into_content() {
			Some(Value::Null) | None => {
				Err(ApiError::NotFound(format!("{} {} not found", T::NAME, id)).into())
			}
			Some(data) => Ok(decode(data)?),
		}
	}

	/// Draft for a new record
	pub fn new_draft(&self) -> Draft<T> {
		EntityDraft::create(Entity::default())
	}

	/// Draft for an existing record, loaded by id
	pub async fn edit_draft(&self, id: impl Into<EntityId>) -> ResourceResult<Draft<T>> {
		let entity = self.get(id).await?;
		Ok(EntityDraft::edit(entity))
	}

	/// Draft for a record already at hand (e.g. a row of [`list`](Self::list))
	pub fn draft_from(&self, entity: Entity<T>) -> Draft<T> {
		EntityDraft::edit(entity)
	}

	/// Validate and send the draft: `Create` for a new record, `Update` for an
	/// existing one.
	///
	/// The draft is closed on success and stays open on failure so the user can
	/// correct it. Nothing is sent when validation fails.
	pub async fn submit(&self, draft: &mut Draft<T>) -> ResourceResult<MutationOutcome> {
		let entity = draft.payload()?;
		entity.validate().map_err(ResourceError::Invalid)?;

		let (options, verb) = if draft.is_creating() {
			(MutationOptions::post(action_path::<T>(T::CREATE_ACTION)), "created")
		} else {
			if entity.assigned_id().is_none() {
				return Err(ResourceError::MissingId(T::NAME));
			}
			(MutationOptions::put(action_path::<T>(T::UPDATE_ACTION)), "updated")
		};
		let options = self
			.invalidating(options)
			.success_text(format!("{} {}", T::NAME, verb));

		let outcome = self.client.mutation(options).mutate(entity).await?;
		draft.close();
		Ok(outcome)
	}

	/// Delete the record `id`; deleting a record that is already gone is not an
	/// error (see [`MutationOutcome::AlreadyGone`])
	pub async fn delete(&self, id: impl Into<EntityId>) -> ResourceResult<MutationOutcome> {
		let options = self
			.invalidating(MutationOptions::delete(action_path::<T>(T::DELETE_ACTION)))
			.success_text(format!("{} deleted", T::NAME));
		Ok(self.client.mutation(options).delete(id).await?)
	}

	/// Mark the collection stale
	pub fn invalidate(&self) {
		self.client
			.invalidate_queries(std::iter::once(T::CACHE_KEY).chain(T::DEPENDENT_KEYS.iter().copied()));
	}

	fn invalidating(&self, options: MutationOptions) -> MutationOptions {
		T::DEPENDENT_KEYS
			.iter()
			.fold(options.invalidates(T::CACHE_KEY), |options, key| options.invalidates(*key))
	}
}

pub(crate) fn decode<D: DeserializeOwned>(data: Value) -> Result<D, ApiError> {
	serde_json::from_value(data).map_err(|e| ApiError::Decode(e.to_string()))
}
