//! LLM prompts for Flutter code generation and UI element extraction
//!
//! The code prompt fixes the output conventions the extractor relies on:
//! one fenced dart block per file, first line `// <file>.dart`.

use tracing::trace;

/// System prompt for generating Flutter code
pub const CODE_SYSTEM_PROMPT: &str = r#"You are a senior Flutter engineer who turns UI designs into production-ready Dart code.

Output rules:
1. Emit every file as its own fenced block: ```dart on the opening line.
2. The first line inside each block is a comment with the file name, e.g. // login_screen.dart
3. Name files by role:
   - screens (full pages):      <name>_screen.dart, extending StatelessWidget or StatefulWidget
   - reusable widgets:          <name>_widget.dart
   - data models:               <name>_model.dart, plain classes with final fields and a constructor
   - services / repositories:   <name>_service.dart
4. Put the application bootstrap (void main() and runApp) in main.dart, and only there.
5. Use Material 3 widgets, const constructors where possible, and no external packages.
6. Do not leave TODOs or placeholders; every file must compile on its own imports."#;

/// User instruction accompanying an image for code generation
pub const CODE_FROM_IMAGE_PROMPT: &str = r#"Recreate the user interface in this image as a Flutter application.
Match layout, spacing, colors and typography as closely as possible.
Split the UI into screens, reusable widgets, models and services as appropriate."#;

/// User instruction for text-only code generation
pub const CODE_FROM_TEXT_PROMPT: &str = r#"Build the Flutter application described below.
Split the UI into screens, reusable widgets, models and services as appropriate.

Description:
"#;

/// System prompt for extracting UI elements as structured shapes
pub const ELEMENTS_SYSTEM_PROMPT: &str = r##"You convert UI screenshots into vector shapes for a design editor.

Output ONLY a JSON array, nothing else. Each item is one shape:
{"type": "rectangle" | "circle" | "text" | "line", "x": number, "y": number, ...}

Geometry by type:
- rectangle: width, height (optional rotation)
- circle:    radius (x, y is the center)
- text:      text, fontSize (optional fontFamily)
- line:      x2, y2 (end point)

Optional style on any shape: fill ("#RRGGBB"), stroke ("#RRGGBB"), strokeWidth, opacity (0-1).
Coordinates are pixels from the top-left corner of the image. If nothing is recognizable, output []."##;

/// User instruction accompanying an image for element extraction
pub const ELEMENTS_PROMPT: &str = "Extract every visible UI element in this image as shapes.";

/// Caller-supplied metadata for a generation request
#[derive(Debug, Clone, Default)]
pub struct GenerationOptions {
  /// Name of the app being generated
  pub app_name: Option<String>,
  /// Extra instructions appended to the prompt
  pub instructions: Option<String>,
}

impl GenerationOptions {
  pub fn with_app_name(mut self, app_name: impl Into<String>) -> Self {
    self.app_name = Some(app_name.into());
    self
  }

  pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
    self.instructions = Some(instructions.into());
    self
  }
}

fn push_options(prompt: &mut String, options: &GenerationOptions) {
  if let Some(name) = options.app_name.as_deref().filter(|n| !n.trim().is_empty()) {
    prompt.push_str("\n\nApp name: ");
    prompt.push_str(name.trim());
  }
  if let Some(extra) = options.instructions.as_deref().filter(|i| !i.trim().is_empty()) {
    prompt.push_str("\n\nAdditional instructions:\n");
    prompt.push_str(extra.trim());
  }
}

/// Build the user prompt for image-based code generation
pub fn build_image_code_prompt(options: &GenerationOptions) -> String {
  let mut prompt = String::from(CODE_FROM_IMAGE_PROMPT);
  push_options(&mut prompt, options);
  trace!(prompt_len = prompt.len(), "Built image code prompt");
  prompt
}

/// Build the user prompt for text-based code generation
pub fn build_text_code_prompt(description: &str, options: &GenerationOptions) -> String {
  let mut prompt = String::from(CODE_FROM_TEXT_PROMPT);
  prompt.push_str(description.trim());
  push_options(&mut prompt, options);
  trace!(prompt_len = prompt.len(), "Built text code prompt");
  prompt
}

/// Build the user prompt for element extraction
pub fn build_elements_prompt(options: &GenerationOptions) -> String {
  let mut prompt = String::from(ELEMENTS_PROMPT);
  if let Some(extra) = options.instructions.as_deref().filter(|i| !i.trim().is_empty()) {
    prompt.push_str("\n\nAdditional instructions:\n");
    prompt.push_str(extra.trim());
  }
  prompt
}
