//! Bootstrap synthesis for bundles that arrive without a `main.dart`

use forge_core::{Artifact, GenerationBundle, MAIN_ENTRY_NAME};
use tracing::debug;

use crate::signature::ui_class_name;
use crate::text::{dart_string, pascal_case};

/// Class name a screen artifact declares, or one derived from its name
pub fn screen_class_name(screen: &Artifact) -> String {
  ui_class_name(&screen.code)
    .map(str::to_string)
    .unwrap_or_else(|| pascal_case(&screen.name))
}

/// Build a `main.dart` that boots the first screen, or a placeholder home
pub fn synthesize_main_entry(screens: &[Artifact], app_title: &str) -> Artifact {
  let title = dart_string(app_title);

  let code = match screens.first() {
    Some(screen) => {
      let class_name = screen_class_name(screen);
      format!(
        r#"import 'package:flutter/material.dart';
import 'screens/{file}.dart';

void main() {{
  runApp(const GeneratedApp());
}}

class GeneratedApp extends StatelessWidget {{
  const GeneratedApp({{super.key}});

  @override
  Widget build(BuildContext context) {{
    return MaterialApp(
      title: {title},
      debugShowCheckedModeBanner: false,
      theme: ThemeData(colorSchemeSeed: Colors.indigo, useMaterial3: true),
      home: {class_name}(),
    );
  }}
}}
"#,
        file = screen.name,
      )
    }
    None => format!(
      r#"import 'package:flutter/material.dart';

void main() {{
  runApp(const GeneratedApp());
}}

class GeneratedApp extends StatelessWidget {{
  const GeneratedApp({{super.key}});

  @override
  Widget build(BuildContext context) {{
    return MaterialApp(
      title: {title},
      debugShowCheckedModeBanner: false,
      theme: ThemeData(colorSchemeSeed: Colors.indigo, useMaterial3: true),
      home: const PlaceholderHome(),
    );
  }}
}}

class PlaceholderHome extends StatelessWidget {{
  const PlaceholderHome({{super.key}});

  @override
  Widget build(BuildContext context) {{
    return Scaffold(
      appBar: AppBar(title: const Text({title})),
      body: const Center(child: Text('No screens were generated.')),
    );
  }}
}}
"#
    ),
  };

  Artifact::new(MAIN_ENTRY_NAME, code)
}

/// Fill in `main_entry` when the bundle has none. Returns true if one was added.
pub fn ensure_main_entry(bundle: &mut GenerationBundle, app_title: &str) -> bool {
  if bundle.main_entry.is_some() {
    return false;
  }
  debug!(screens = bundle.screens.len(), "Synthesizing main entry");
  bundle.main_entry = Some(synthesize_main_entry(&bundle.screens, app_title));
  true
}
