// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod enhance;
pub mod ids;
pub mod page;
pub mod state;
pub mod template;

pub use ids::*;
pub use page::*;
pub use state::*;
pub use template::{MenuCategory, MenuEntry, TableSpec, TemplateSpec, build_page};
