use std::{
	collections::{BTreeMap, HashSet},
	ops::Range,
};

use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Serialize};

use super::error::*;

/// The nested name → (offset | subtree) structure describing an archive's contents.
/// Leaves hold the absolute offset of the entry's [`FileHeader`](crate::global::entry::FileHeader).
/// Names keep their original casing, lookups ignore it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DirTree {
	/// A file, serialized as `base64(u64 little-endian offset)`
	File(#[serde(with = "offset_base64")] u64),
	/// A subdirectory
	Directory(BTreeMap<String, DirTree>),
}

// On-disk shape: {"tree": { ... }}
#[derive(Deserialize)]
struct TreeDocument {
	tree: BTreeMap<String, DirTree>,
}

#[derive(Serialize)]
struct TreeDocumentRef<'a> {
	tree: &'a BTreeMap<String, DirTree>,
}

mod offset_base64 {
	use super::*;
	use serde::{de::Error, Deserializer, Serializer};

	pub fn serialize<S: Serializer>(offset: &u64, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_str(&general_purpose::STANDARD.encode(offset.to_le_bytes()))
	}

	pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
		let encoded = String::deserialize(deserializer)?;
		let bytes = general_purpose::STANDARD.decode(&encoded).map_err(D::Error::custom)?;

		let bytes: [u8; 8] = bytes
			.try_into()
			.map_err(|b: Vec<u8>| D::Error::custom(format!("offset must be 8 bytes, found {}", b.len())))?;

		Ok(u64::from_le_bytes(bytes))
	}
}

impl Default for DirTree {
	fn default() -> Self {
		DirTree::Directory(BTreeMap::new())
	}
}

// Splits on both separators and drops empty and `.` segments
fn segments(path: &str) -> impl Iterator<Item = &str> {
	path.split(|c: char| c == '/' || c == '\\').filter(|s| !s.is_empty() && *s != ".")
}

// Exact match first, then the first key equal under lower-casing
fn find_child<'a>(children: &'a BTreeMap<String, DirTree>, name: &str) -> Option<&'a DirTree> {
	if let Some(child) = children.get(name) {
		return Some(child);
	}

	let lowered = name.to_lowercase();
	children
		.iter()
		.find(|(key, _)| key.to_lowercase() == lowered)
		.map(|(_, child)| child)
}

impl DirTree {
	/// An empty root directory
	pub fn new() -> DirTree {
		DirTree::default()
	}

	/// Parse the `{"tree": {...}}` document
	pub fn from_json(source: &str) -> InternalResult<DirTree> {
		let document: TreeDocument =
			serde_json::from_str(source).map_err(|err| InternalError::DirectoryTreeError(err.to_string()))?;

		Ok(DirTree::Directory(document.tree))
	}

	/// Serialize into the canonical `{"tree": {...}}` document, keys sorted
	pub fn to_json(&self) -> InternalResult<String> {
		let children = match self {
			DirTree::Directory(children) => children,
			DirTree::File(_) => {
				return Err(InternalError::DirectoryTreeError(
					"the root of a directory tree must be a directory".to_string(),
				))
			},
		};

		let document = TreeDocumentRef { tree: children };

		serde_json::to_string(&document).map_err(|err| InternalError::DirectoryTreeError(err.to_string()))
	}

	/// Inserts a file under a `/` separated id, creating intermediate directories
	pub fn insert(&mut self, id: &str, offset: u64) -> InternalResult {
		let parts: Vec<&str> = segments(id).collect();
		let duplicate = || InternalError::DuplicateLeafID(id.to_string());

		let (name, parents) = match parts.split_last() {
			Some(split) => split,
			None => return Err(InternalError::OtherError(format!("Invalid leaf ID: {:?}", id).into())),
		};

		let mut current = self;
		for part in parents {
			current = match current {
				DirTree::Directory(children) => children.entry(part.to_string()).or_default(),
				DirTree::File(_) => return Err(duplicate()),
			};
		}

		match current {
			DirTree::Directory(children) => {
				if children.contains_key(*name) {
					return Err(duplicate());
				}

				children.insert(name.to_string(), DirTree::File(offset));
				Ok(())
			},
			DirTree::File(_) => Err(duplicate()),
		}
	}

	/// Follow `path` from this node. `..` climbs back out of a directory entered earlier in the same path,
	/// climbing above the starting node fails with [`InternalError::OutOfArchiveBounds`]
	pub fn walk(&self, path: &str) -> InternalResult<&DirTree> {
		let mut stack: Vec<&DirTree> = Vec::new();
		let mut current = self;
		let mut parts = segments(path).peekable();

		while let Some(part) = parts.next() {
			if part == ".." {
				current = match stack.pop() {
					Some(parent) => parent,
					None => return Err(InternalError::OutOfArchiveBounds(path.to_string())),
				};

				continue;
			}

			let children = match current {
				DirTree::Directory(children) => children,
				DirTree::File(_) => return Err(InternalError::NotADirectory(path.to_string())),
			};

			match find_child(children, part) {
				Some(DirTree::File(_)) if parts.peek().is_some() => {
					return Err(InternalError::NotADirectory(path.to_string()));
				},
				Some(child) => {
					stack.push(current);
					current = child;
				},
				None => return Err(InternalError::MissingResourceError(path.to_string())),
			}
		}

		Ok(current)
	}

	/// Resolve a file path to the offset of its [`FileHeader`](crate::global::entry::FileHeader)
	pub fn resolve(&self, path: &str) -> InternalResult<u64> {
		match self.walk(path)? {
			DirTree::File(offset) => Ok(*offset),
			DirTree::Directory(_) => Err(InternalError::NotAFile(path.to_string())),
		}
	}

	/// The directory found at `root`, an empty root returns the whole tree
	pub fn subtree(&self, root: &str) -> InternalResult<&DirTree> {
		match self.walk(root)? {
			DirTree::File(_) => Err(InternalError::NotADirectory(root.to_string())),
			directory => Ok(directory),
		}
	}

	/// Every file below this node as a `/` joined path and its offset, in key order
	pub fn paths(&self) -> Vec<(String, u64)> {
		fn collect(node: &DirTree, prefix: &str, output: &mut Vec<(String, u64)>) {
			match node {
				DirTree::File(offset) => output.push((prefix.to_string(), *offset)),
				DirTree::Directory(children) => {
					for (name, child) in children {
						let path = if prefix.is_empty() {
							name.clone()
						} else {
							format!("{}/{}", prefix, name)
						};

						collect(child, &path, output);
					}
				},
			}
		}

		let mut output = Vec::new();
		collect(self, "", &mut output);
		output
	}

	/// Checks that every leaf offset is unique and lies inside the data `region`
	pub(crate) fn validate_offsets(&self, region: Range<u64>) -> InternalResult {
		let mut seen = HashSet::new();

		for (path, offset) in self.paths() {
			if !region.contains(&offset) {
				return Err(InternalError::DirectoryTreeError(format!(
					"{} points to offset {}, outside the data region {:?}",
					path, offset, region
				)));
			}

			if !seen.insert(offset) {
				return Err(InternalError::DirectoryTreeError(format!(
					"{} shares offset {} with another entry",
					path, offset
				)));
			}
		}

		Ok(())
	}
}
