pub mod metadata;
pub mod node;

pub use metadata::{Metadata, ProjectRelations, Relation, build_metadata};
pub use node::ArtifactNode;
