// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use tablero_app::page::Page;
use tablero_app::template::{TemplateSpec, build_page};
use tablero_prefs::PrefStore;

/// Host backed by the preference store. The page source is a template spec,
/// rebuilt from scratch on every render the way a server would re-serve the
/// document.
pub struct PrefsRuntime<'a> {
    store: &'a PrefStore,
    spec: TemplateSpec,
}

impl<'a> PrefsRuntime<'a> {
    pub fn new(store: &'a PrefStore, spec: TemplateSpec) -> Self {
        Self { store, spec }
    }
}

impl tablero_tui::PageHost for PrefsRuntime<'_> {
    fn load_sidebar_collapsed(&mut self) -> Result<Option<bool>> {
        self.store.sidebar_collapsed()
    }

    fn store_sidebar_collapsed(&mut self, collapsed: bool) -> Result<()> {
        self.store.set_sidebar_collapsed(collapsed)
    }

    fn render_page(&mut self) -> Result<Page> {
        Ok(build_page(&self.spec))
    }
}
