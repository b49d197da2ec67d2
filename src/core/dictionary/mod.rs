//! Locale dictionaries: nested trees, their flattened view and the file codec.

pub mod codec;
pub mod index;
pub mod literal;
pub mod tree;

pub use codec::{DictionaryFormat, ScriptStyle, load, save, try_load};
pub use index::FlattenedIndex;
pub use tree::{DictionaryTree, KeyAction};
