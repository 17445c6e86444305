mod artifact;
mod layout;

pub use artifact::MavenArtifact;
pub use layout::PathLayout;
