//! Chapter records as delivered by a chapter source, and the trimmed view type
//! used by the display layer.

use serde::{Deserialize, Serialize};

/// Parent id carried by the first chapter of a story.
pub const ROOT_PARENT_ID: u64 = 0;

/// One story chapter as stored by the backend.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterRecord {
	/// Unique within a story.
	pub id: u64,
	/// Story tree this chapter belongs to.
	pub story_id: u64,
	/// Free-form chapter text.
	#[serde(default)]
	pub content: String,
	/// Author identity. Opaque, never validated here.
	#[serde(default)]
	pub wallet_address: String,
	#[serde(default)]
	pub level: u32,
	/// Ancestor ids from the story root down to this chapter.
	#[serde(default)]
	pub path: Vec<u64>,
	#[serde(default)]
	pub is_anonymous: bool,
	#[serde(default)]
	pub has_child: bool,
	/// The chapter this one continues; [`ROOT_PARENT_ID`] for roots.
	#[serde(default)]
	pub parent_id: u64,
	#[serde(default)]
	pub credential: String,
	/// Unix timestamp (seconds).
	#[serde(default)]
	pub created_at: u64,
}

impl ChapterRecord {
	/// Whether this chapter starts a story.
	pub fn is_root(&self) -> bool {
		self.parent_id == ROOT_PARENT_ID
	}
}

/// Display-side chapter: server-only fields removed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
	pub id: u64,
	pub content: String,
	pub story_id: u64,
	pub parent_id: u64,
	pub wallet_address: String,
	pub path: Vec<u64>,
	/// Never filled in from a record.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub child_count: Option<u32>,
}

impl From<ChapterRecord> for Chapter {
	fn from(record: ChapterRecord) -> Self {
		Self {
			id: record.id,
			content: record.content,
			story_id: record.story_id,
			parent_id: record.parent_id,
			wallet_address: record.wallet_address,
			path: record.path,
			child_count: None,
		}
	}
}

impl From<&ChapterRecord> for Chapter {
	fn from(record: &ChapterRecord) -> Self {
		record.clone().into()
	}
}

/// Shortens a wallet address to `0x1234…abcd` form. Short inputs are returned as is.
pub fn short_address(address: &str) -> String {
	let chars: Vec<char> = address.chars().collect();
	if chars.len() <= 10 {
		return address.to_string();
	}
	let head: String = chars[..6].iter().collect();
	let tail: String = chars[chars.len() - 4..].iter().collect();
	format!("{head}…{tail}")
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn record_deserializes_with_missing_metadata() {
		let json = r#"{"id": 7, "story_id": 1, "parent_id": 3, "path": [1, 3, 7], "content": "hi"}"#;
		let record: ChapterRecord = serde_json::from_str(json).unwrap();
		assert_eq!(record.id, 7);
		assert_eq!(record.path, vec![1, 3, 7]);
		assert!(!record.is_anonymous);
		assert_eq!(record.created_at, 0);
		assert!(!record.is_root());
	}

	#[test]
	fn chapter_view_drops_server_fields() {
		let record = ChapterRecord {
			id: 2,
			story_id: 1,
			content: "The door creaked.".into(),
			wallet_address: "0xabc".into(),
			level: 2,
			path: vec![1, 2],
			is_anonymous: true,
			has_child: true,
			parent_id: 1,
			credential: "secret".into(),
			created_at: 1_708_000_000,
		};
		let chapter = Chapter::from(&record);
		assert_eq!(chapter.id, 2);
		assert_eq!(chapter.parent_id, 1);
		assert_eq!(chapter.path, vec![1, 2]);
		assert_eq!(chapter.child_count, None);

		let json = serde_json::to_value(&chapter).unwrap();
		assert!(json.get("credential").is_none());
		assert!(json.get("child_count").is_none());
	}

	#[test]
	fn short_address_keeps_ends() {
		assert_eq!(
			short_address("0x1234567890abcdef1234567890abcdef12345678"),
			"0x1234…5678"
		);
		assert_eq!(short_address("0xabc"), "0xabc");
		assert_eq!(short_address(""), "");
	}
}
