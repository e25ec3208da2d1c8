mod ui;

use crate::session::DomainDraft;

/// Domain list and the "New Domain" dialog.
#[derive(Debug, Default)]
pub struct DomainPanel {
    draft: Option<DomainDraft>,
}

impl DomainPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_editing(&self) -> bool {
        self.draft.is_some()
    }

    pub fn open(&mut self, default_resolution: usize) {
        self.draft = Some(DomainDraft::new(default_resolution));
    }

    pub fn reopen(&mut self, draft: DomainDraft) {
        self.draft = Some(draft);
    }
}
