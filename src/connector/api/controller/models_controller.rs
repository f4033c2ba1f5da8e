use anyhow::Result;

use crate::domain::ModelInfo;

use super::super::Container;

pub struct ModelsController<'a> {
    container: &'a Container,
}

impl<'a> ModelsController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn list(&self) -> Result<String> {
        let use_case = self.container.discover_models_use_case();
        let models = use_case.execute().await?;
        Ok(format_model_list(&models, &use_case.selected_model()))
    }

    pub async fn select(&self, model_id: String) -> Result<String> {
        let use_case = self.container.discover_models_use_case();
        let model = use_case.select(&model_id).await?;
        Ok(format!(
            "Gemini model set to {} ({}).",
            model.id(),
            model.display_name()
        ))
    }
}

/// One model per line, flash models first, the saved one marked with `*`.
fn format_model_list(models: &[ModelInfo], selected: &str) -> String {
    let mut output = format!("Available Gemini models ({}):\n\n", models.len());
    for model in models {
        let marker = if model.id() == selected { "*" } else { " " };
        if model.display_name() == model.id() {
            output.push_str(&format!("{} {}\n", marker, model.id()));
        } else {
            output.push_str(&format!(
                "{} {} ({})\n",
                marker,
                model.id(),
                model.display_name()
            ));
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marks_selected_model() {
        let models = vec![
            ModelInfo::new("gemini-2.0-flash", "Gemini 2.0 Flash"),
            ModelInfo::from_id("gemini-pro"),
        ];

        let output = format_model_list(&models, "gemini-pro");

        assert!(output.starts_with("Available Gemini models (2):"));
        assert!(output.contains("  gemini-2.0-flash (Gemini 2.0 Flash)\n"));
        assert!(output.contains("* gemini-pro\n"));
    }
}
