mod ui;

use crate::session::functions::FunctionDraft;

/// Function list and the "Modify Function" dialog.
#[derive(Debug, Default)]
pub struct FunctionPanel {
    editor: Option<FunctionDraft>,
    /// Outcome of the last "Detect parameters", shown inside the dialog.
    detect_message: Option<String>,
}

impl FunctionPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_editing(&self) -> bool {
        self.editor.is_some()
    }

    /// Open the dialog again with `draft`, e.g. after it was rejected.
    pub fn reopen(&mut self, draft: FunctionDraft) {
        self.editor = Some(draft);
    }

    fn detect_parameters(&mut self) {
        let Some(draft) = self.editor.as_mut() else {
            return;
        };
        self.detect_message = Some(match draft.detect_parameters() {
            Ok(0) => "no undeclared symbols".to_string(),
            Ok(1) => "added 1 parameter".to_string(),
            Ok(added) => format!("added {added} parameters"),
            Err(err) => err.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_parameters_in_dialog() {
        let mut panel = FunctionPanel::new();
        assert!(!panel.is_editing());
        panel.reopen(FunctionDraft {
            name: "wave".into(),
            expression: "A*sin(k*x)".into(),
            parameters: vec![("A".into(), "2".into())],
        });
        panel.detect_parameters();
        assert_eq!(panel.detect_message.as_deref(), Some("added 1 parameter"));
        let draft = panel.editor.as_ref().unwrap();
        assert_eq!(draft.parameters[1], ("k".to_string(), "1".to_string()));

        panel.editor.as_mut().unwrap().expression = "A*(".into();
        panel.detect_parameters();
        assert!(panel.detect_message.unwrap().contains("column"));
    }
}
