//! Route table and routing artifacts for multi-view projects

use std::collections::HashSet;
use std::fmt::Write;

use forge_core::{GeneratedFile, NavigationBundle, NavigationConfig, RouteEntry, ViewDescriptor};
use tracing::{debug, info};

use crate::text::{capitalize, dart_string, snake_case, words};

pub const ROUTES_FILE: &str = "lib/navigation/app_routes.dart";
pub const HELPER_FILE: &str = "lib/navigation/navigation_helper.dart";
pub const MAIN_FILE: &str = "lib/main.dart";
pub const DRAWER_FILE: &str = "lib/widgets/app_drawer.dart";

const DART_RESERVED: &[&str] = &[
  "abstract", "as", "assert", "async", "await", "break", "case", "catch", "class", "const", "continue", "default",
  "do", "else", "enum", "export", "extends", "external", "false", "final", "finally", "for", "get", "if",
  "implements", "import", "in", "is", "late", "library", "new", "null", "operator", "part", "required", "rethrow",
  "return", "set", "static", "super", "switch", "this", "throw", "true", "try", "var", "void", "while", "with",
  "yield", "routes", "initialRoute",
];

/// `User Profile` -> `user_profile`
pub fn route_name(display_name: &str) -> String {
  words(display_name).map(str::to_lowercase).collect::<Vec<_>>().join("_")
}

/// `user profile` -> `UserProfileScreen`
pub fn route_class_name(display_name: &str) -> String {
  let base: String = words(display_name).map(capitalize).collect();
  if base.ends_with("Screen") {
    base
  } else {
    format!("{}Screen", base)
  }
}

/// Dart identifier for a route constant (`user_profile` -> `userProfile`)
fn route_identifier(internal_name: &str) -> String {
  let mut parts = internal_name.split('_').filter(|p| !p.is_empty());
  let mut ident = parts.next().unwrap_or("route").to_string();
  ident.extend(parts.map(capitalize));

  let starts_with_digit = ident.chars().next().is_some_and(|c| c.is_ascii_digit());
  if starts_with_digit || DART_RESERVED.contains(&ident.as_str()) {
    format!("route{}", capitalize(&ident))
  } else {
    ident
  }
}

/// Index of the initial view.
///
/// Keywords are tried in order and, for each keyword, views in order; the
/// first view whose name contains the keyword wins. Defaults to the first view.
pub fn select_initial(names: &[&str], keywords: &[String]) -> usize {
  let lowered: Vec<String> = names.iter().map(|n| n.to_lowercase()).collect();
  for keyword in keywords {
    let keyword = keyword.to_lowercase();
    if keyword.is_empty() {
      continue;
    }
    if let Some(idx) = lowered.iter().position(|n| n.contains(&keyword)) {
      debug!(keyword = %keyword, view = names[idx], "Initial route matched keyword");
      return idx;
    }
  }
  0
}

/// Static members of the generated `AppRoutes` class
const ROUTE_MEMBERS: [&str; 2] = ["initialRoute", "routes"];

/// First of `base`, `{base}2`, `{base}3`, ... accepted by `is_free`
fn first_free(base: &str, mut is_free: impl FnMut(&str) -> bool) -> String {
  if is_free(base) {
    return base.to_string();
  }
  (2..)
    .map(|n| format!("{}{}", base, n))
    .find(|candidate| is_free(candidate))
    .unwrap_or_else(|| base.to_string())
}

/// One route per view.
///
/// Internal names, Dart identifiers, screen class names and screen files are
/// each unique across the table, even when distinct view names collapse to
/// the same identifier (`Step 2` and `Step2`).
pub fn build_routes(views: &[ViewDescriptor], keywords: &[String]) -> Vec<RouteEntry> {
  let names: Vec<&str> = views.iter().map(|v| v.name.as_str()).collect();
  let initial = select_initial(&names, keywords);
  let mut taken: HashSet<String> = HashSet::new();
  let mut identifiers: HashSet<String> = HashSet::new();
  let mut classes: HashSet<String> = HashSet::new();
  let mut files: HashSet<String> = HashSet::new();

  views
    .iter()
    .enumerate()
    .map(|(idx, view)| {
      let mut internal_name = route_name(&view.name);
      if internal_name.is_empty() {
        internal_name = format!("view_{}", idx + 1);
      }
      let base = internal_name.clone();
      let mut n = 2;
      while !taken.insert(internal_name.clone()) {
        internal_name = format!("{}_{}", base, n);
        n += 1;
      }

      let mut class_base = if internal_name == base && !view.name.trim().is_empty() {
        route_class_name(&view.name)
      } else {
        route_class_name(&internal_name)
      };
      if class_base.starts_with(|c: char| c.is_ascii_digit()) {
        class_base = format!("View{}", class_base);
      }
      let class_stem = class_base.strip_suffix("Screen").unwrap_or(&class_base).to_string();
      let stem = first_free(&class_stem, |candidate| {
        let class = format!("{}Screen", candidate);
        !classes.contains(&class) && !files.contains(&snake_case(&class))
      });
      let screen_class_name = format!("{}Screen", stem);
      classes.insert(screen_class_name.clone());
      files.insert(snake_case(&screen_class_name));

      let identifier = first_free(&route_identifier(&internal_name), |candidate| {
        !identifiers.contains(candidate) && !DART_RESERVED.contains(&candidate) && !ROUTE_MEMBERS.contains(&candidate)
      });
      identifiers.insert(identifier.clone());

      RouteEntry {
        path: format!("/{}", internal_name),
        internal_name,
        identifier,
        screen_class_name,
        is_initial: idx == initial,
        display_label: view.name.clone(),
        element_count: view.elements.len(),
      }
    })
    .collect()
}

/// Route table and routing files for a project, or `None` below the view threshold
pub fn synthesize_navigation(
  views: &[ViewDescriptor],
  config: &NavigationConfig,
  app_title: &str,
) -> Option<NavigationBundle> {
  if views.len() < config.min_views.max(1) {
    debug!(views = views.len(), min_views = config.min_views, "Not enough views for navigation");
    return None;
  }

  let routes = build_routes(views, &config.initial_route_keywords);
  let files = vec![
    GeneratedFile::new(ROUTES_FILE, render_routes(&routes)),
    GeneratedFile::new(HELPER_FILE, render_helper(&routes)),
    GeneratedFile::new(MAIN_FILE, render_main(app_title)),
    GeneratedFile::new(DRAWER_FILE, render_drawer(&routes, app_title)),
  ];

  info!(
    routes = routes.len(),
    initial = routes.iter().find(|r| r.is_initial).map(|r| r.path.as_str()).unwrap_or("/"),
    "Generated navigation"
  );
  Some(NavigationBundle { routes, files })
}

fn screen_file(route: &RouteEntry) -> String {
  format!("{}.dart", snake_case(&route.screen_class_name))
}

fn render_routes(routes: &[RouteEntry]) -> String {
  let mut out = String::from("import 'package:flutter/material.dart';\n\n");
  for route in routes {
    let _ = writeln!(out, "import '../screens/{}';", screen_file(route));
  }

  out.push_str("\nclass AppRoutes {\n  AppRoutes._();\n\n");
  for route in routes {
    let _ = writeln!(
      out,
      "  static const String {} = {};",
      route.identifier,
      dart_string(&route.path)
    );
  }

  let initial = routes.iter().find(|r| r.is_initial).or(routes.first());
  if let Some(initial) = initial {
    let _ = writeln!(
      out,
      "\n  static const String initialRoute = {};",
      initial.identifier
    );
  }

  out.push_str("\n  static Map<String, WidgetBuilder> get routes => {\n");
  for route in routes {
    let _ = writeln!(
      out,
      "        {}: (context) => {}(),",
      route.identifier,
      route.screen_class_name
    );
  }
  out.push_str("      };\n}\n");
  out
}

fn render_helper(routes: &[RouteEntry]) -> String {
  let mut out = String::from(
    "import 'package:flutter/material.dart';\n\nimport 'app_routes.dart';\n\nclass NavigationHelper {\n  NavigationHelper._();\n",
  );

  for route in routes {
    let ident = &route.identifier;
    let method = capitalize(ident);
    let _ = write!(
      out,
      "\n  static Future<T?> goTo{method}<T>(BuildContext context) =>\n      Navigator.pushNamed<T>(context, AppRoutes.{ident});\n\n  static Future<T?> replaceWith{method}<T>(BuildContext context) =>\n      Navigator.pushReplacementNamed<T, Object?>(context, AppRoutes.{ident});\n"
    );
  }

  out.push_str(
    "\n  static void goBack(BuildContext context) => Navigator.maybePop(context);\n\n  static void goHome(BuildContext context) =>\n      Navigator.pushNamedAndRemoveUntil(context, AppRoutes.initialRoute, (route) => false);\n}\n",
  );
  out
}

fn render_main(app_title: &str) -> String {
  let title = dart_string(app_title);
  format!(
    r#"import 'package:flutter/material.dart';

import 'navigation/app_routes.dart';

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
      initialRoute: AppRoutes.initialRoute,
      routes: AppRoutes.routes,
    );
  }}
}}
"#
  )
}

fn render_drawer(routes: &[RouteEntry], app_title: &str) -> String {
  let mut out = format!(
    r#"import 'package:flutter/material.dart';

import '../navigation/app_routes.dart';

class AppDrawer extends StatelessWidget {{
  const AppDrawer({{super.key, this.currentRoute}});

  final String? currentRoute;

  @override
  Widget build(BuildContext context) {{
    return Drawer(
      child: ListView(
        padding: EdgeInsets.zero,
        children: [
          DrawerHeader(
            decoration: BoxDecoration(color: Theme.of(context).colorScheme.primaryContainer),
            child: Text({title}, style: Theme.of(context).textTheme.titleLarge),
          ),
"#,
    title = dart_string(app_title)
  );

  for route in routes {
    let count = match route.element_count {
      1 => "1 element".to_string(),
      n => format!("{} elements", n),
    };
    let _ = writeln!(
      out,
      "          _item(context, {}, {}, AppRoutes.{}),",
      dart_string(&route.display_label),
      dart_string(&count),
      route.identifier
    );
  }

  out.push_str(
    r#"        ],
      ),
    );
  }

  Widget _item(BuildContext context, String label, String subtitle, String route) {
    return ListTile(
      title: Text(label),
      subtitle: Text(subtitle),
      selected: currentRoute == route,
      onTap: () {
        Navigator.pop(context);
        if (currentRoute != route) {
          Navigator.pushReplacementNamed(context, route);
        }
      },
    );
  }
}
"#,
  );
  out
}
