pub mod indices;
pub mod instance;
pub mod layout;
pub mod topology;
