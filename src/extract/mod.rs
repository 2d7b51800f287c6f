mod dom;
mod selector;
mod text;

pub use dom::{Extractor, RawComment, RawComments};
pub use selector::{FieldSelector, IssueSelectors, GITHUB};
pub use text::{normalize_ws, visible_text};
