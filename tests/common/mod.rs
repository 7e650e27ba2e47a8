pub mod fake_provider;
pub mod fake_renderer;
pub mod fixtures;
