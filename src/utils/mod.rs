pub mod path;
pub mod uri;
