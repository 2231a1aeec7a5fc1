pub mod relationships;
pub mod timelines;
