//! Content module - front-matter, index building and post resolution

mod error;
mod frontmatter;
pub mod identity;
pub mod index;
mod markdown;
mod post;
pub mod store;
mod taxonomy;

pub use error::{ContentError, ContentResult};
pub use frontmatter::{AuthorField, FrontMatter};
pub use index::{IndexBuilder, IndexSummary};
pub use markdown::MarkdownRenderer;
pub use post::{Author, BlogPost, BlogPostMeta};
pub use store::PostStore;
pub use taxonomy::Taxonomy;
