//! The organisation itself: team, partners, headline figures and admin users

use crate::api::{ResourceApi, decode};
use crate::error::ResourceResult;
use crate::resource::{Entity, Resource, action_path, require_multilingual};
use polyglot_http::{FileId, ValidationErrors};
use polyglot_i18n::{Multilingual, Translatable, translatable};
use serde::{Deserialize, Serialize};

const SKILL_PREFIX: &str = "skills.";

/// Team member shown on the "our team" page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TeamMember {
	/// Full name
	pub name: Multilingual,
	/// Position
	pub role: Multilingual,
	/// Biography
	pub about: Multilingual,
	/// Work experience
	pub experience: Multilingual,
	/// Skills, one multilingual value each
	pub skills: Vec<Multilingual>,
	/// Portrait
	pub pictures_id: Option<FileId>,
}

impl TeamMember {
	/// Append an empty skill and return its field name (`skills.N`)
	pub fn add_skill(&mut self) -> String {
		self.skills.push(Multilingual::default());
		format!("{}{}", SKILL_PREFIX, self.skills.len() - 1)
	}

	/// Remove the skill at `index`, if present
	pub fn remove_skill(&mut self, index: usize) -> Option<Multilingual> {
		(index < self.skills.len()).then(|| self.skills.remove(index))
	}
}

// Skills are addressed as `skills.0`, `skills.1`, ..
impl Translatable for TeamMember {
	fn fields(&self) -> Vec<(String, &Multilingual)> {
		let mut fields = vec![
			("name".to_string(), &self.name),
			("role".to_string(), &self.role),
			("about".to_string(), &self.about),
			("experience".to_string(), &self.experience),
		];
		fields.extend(
			self.skills
				.iter()
				.enumerate()
				.map(|(index, skill)| (format!("{}{}", SKILL_PREFIX, index), skill)),
		);
		fields
	}

	fn field_mut(&mut self, name: &str) -> Option<&mut Multilingual> {
		match name {
			"name" => Some(&mut self.name),
			"role" => Some(&mut self.role),
			"about" => Some(&mut self.about),
			"experience" => Some(&mut self.experience),
			other => {
				let index: usize = other.strip_prefix(SKILL_PREFIX)?.parse().ok()?;
				self.skills.get_mut(index)
			}
		}
	}
}

impl Resource for TeamMember {
	const BASE_PATH: &'static str = "/OurTeam";
	const CACHE_KEY: &'static str = "ourTeam";
	const NAME: &'static str = "Team member";

	fn validate(&self) -> Result<(), ValidationErrors> {
		let mut errors = ValidationErrors::new();
		for field in ["name", "role"] {
			if self.field(field).is_some_and(Multilingual::is_blank) {
				errors.add(field, crate::resource::REQUIRED_MESSAGE);
			}
		}
		errors.into_result()
	}
}

/// Partner organisation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Partner {
	/// Organisation name
	pub name: Multilingual,
	/// Description
	pub about: Multilingual,
	/// Website
	pub link: String,
	/// Logo
	pub pictures_id: Option<FileId>,
}

translatable!(Partner {
	name: "name",
	about: "about",
});

impl Resource for Partner {
	const BASE_PATH: &'static str = "/OurPartners";
	const CACHE_KEY: &'static str = "ourPartners";
	const NAME: &'static str = "Partner";

	fn validate(&self) -> Result<(), ValidationErrors> {
		let mut errors = ValidationErrors::new();
		require_multilingual(self, &mut errors);
		let link = self.link.trim();
		if !link.is_empty() && !(link.starts_with("http://") || link.starts_with("https://")) {
			errors.add("link", "must start with http:// or https://");
		}
		errors.into_result()
	}
}

/// Headline figures on the landing page; a single record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Statistics {
	/// Completed projects
	#[serde(deserialize_with = "lenient_count")]
	pub projects: u64,
	/// Team size
	#[serde(deserialize_with = "lenient_count")]
	pub team_members: u64,
	/// Satisfied clients
	#[serde(deserialize_with = "lenient_count")]
	pub happy_clients: u64,
	/// Years in business
	#[serde(deserialize_with = "lenient_count")]
	pub years_experience: u64,
}

translatable!(Statistics {});

impl Resource for Statistics {
	const BASE_PATH: &'static str = "/Statistics";
	const CACHE_KEY: &'static str = "statistics";
	const NAME: &'static str = "Statistics";
	const LIST_ACTION: &'static str = "Get";
}

impl ResourceApi<Statistics> {
	/// Observer of the single statistics record
	pub fn current(&self) -> polyglot_query::Query<Entity<Statistics>> {
		self.client()
			.query(action_path::<Statistics>(Statistics::LIST_ACTION), Statistics::CACHE_KEY)
	}

	/// The statistics record, from cache when fresh
	pub async fn fetch_current(&self) -> ResourceResult<Entity<Statistics>> {
		let data = self
			.client()
			.fetch(&action_path::<Statistics>(Statistics::LIST_ACTION), Statistics::CACHE_KEY)
			.await?;
		Ok(decode(data)?)
	}
}

/// Counts arrive as numbers or as the strings typed into the form
fn lenient_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
	D: serde::Deserializer<'de>,
{
	use serde::de::Error;

	match serde_json::Value::deserialize(deserializer)? {
		serde_json::Value::Number(n) => n
			.as_u64()
			.or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
			.ok_or_else(|| D::Error::custom(format!("invalid count: {}", n))),
		serde_json::Value::String(s) if s.trim().is_empty() => Ok(0),
		serde_json::Value::String(s) => s
			.trim()
			.parse()
			.map_err(|_| D::Error::custom(format!("invalid count: {:?}", s))),
		serde_json::Value::Null => Ok(0),
		other => Err(D::Error::custom(format!("invalid count: {}", other))),
	}
}

/// Admin account, listed read-only
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct User {
	/// Login email
	pub email: String,
	/// Display name
	pub user_name: String,
	/// Role name
	pub role: Option<String>,
	/// Whether the account has signed in at least once
	pub is_signed: bool,
}

translatable!(User {});

impl Resource for User {
	const BASE_PATH: &'static str = "/User";
	const CACHE_KEY: &'static str = "users";
	const NAME: &'static str = "User";
}

#[cfg(test)]
mod tests {
	use super::*;
	use polyglot_i18n::Language;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	fn test_skills_are_addressable_fields() {
		// Arrange
		let mut member = TeamMember::default();
		let field = member.add_skill();

		// Act
		member.field_mut(&field).unwrap().set(Language::En, "Rust");

		// Assert
		assert_eq!(field, "skills.0");
		assert_eq!(member.skills[0].en, "Rust");
		assert!(member.field_mut("skills.1").is_none());
		assert!(member.field_mut("skills.x").is_none());
		assert_eq!(member.fields().len(), 5);
	}

	#[rstest]
	fn test_team_member_requires_name_and_role_only() {
		let member = TeamMember {
			name: "Ali".into(),
			..TeamMember::default()
		};

		let errors = member.validate().unwrap_err();

		assert!(errors.field("name").is_empty());
		assert_eq!(errors.field("role").len(), 1);
		assert!(errors.field("about").is_empty());
	}

	#[rstest]
	fn test_remove_skill_out_of_range() {
		let mut member = TeamMember::default();
		member.add_skill();
		assert!(member.remove_skill(3).is_none());
		assert!(member.remove_skill(0).is_some());
		assert!(member.skills.is_empty());
	}

	#[rstest]
	#[case(json!(12), 12)]
	#[case(json!("40"), 40)]
	#[case(json!(""), 0)]
	#[case(json!(null), 0)]
	#[case(json!(3.0), 3)]
	fn test_statistics_counts(#[case] raw: serde_json::Value, #[case] expected: u64) {
		let stats: Statistics = serde_json::from_value(json!({ "projects": raw })).unwrap();
		assert_eq!(stats.projects, expected);
		assert_eq!(stats.team_members, 0);
	}

	#[rstest]
	fn test_statistics_rejects_garbage() {
		let result = serde_json::from_value::<Statistics>(json!({ "projects": "many" }));
		assert!(result.is_err());
	}

	#[rstest]
	#[case("", true)]
	#[case("https://example.uz", true)]
	#[case("example.uz", false)]
	fn test_partner_link(#[case] link: &str, #[case] valid: bool) {
		let partner = Partner {
			name: "n".into(),
			about: "a".into(),
			link: link.to_string(),
			pictures_id: None,
		};
		assert_eq!(partner.validate().is_ok(), valid);
	}
}
