use extract::synthesize_navigation;
use forge_core::NavigationBundle;
use llm::GenerationOptions;
use futures::future::join_all;
use tracing::{debug, warn};

use super::GenerationService;
use crate::service::util::ServiceError;

impl GenerationService {
  /// Route table and routing files for a project.
  ///
  /// Returns `Ok(None)` when the project has fewer views than
  /// `navigation.min_views`. Element lists are fetched concurrently; a view
  /// whose fetch fails keeps an empty list. The bootstrap title follows
  /// `options.app_name` like the generated main entry does.
  pub async fn generate_navigation(
    &self,
    project_id: &str,
    options: &GenerationOptions,
  ) -> Result<Option<NavigationBundle>, ServiceError> {
    let (views, figures) = self.collaborators()?;
    let mut project_views = views.find_views_by_project(project_id).await?;

    let min_views = self.config.navigation.min_views;
    if project_views.len() < min_views.max(1) {
      debug!(project_id, views = project_views.len(), min_views, "Skipping navigation");
      return Ok(None);
    }

    let fetches = project_views.iter().map(|view| figures.find_elements_by_view(&view.id));
    let results = join_all(fetches).await;

    for (view, result) in project_views.iter_mut().zip(results) {
      view.elements = match result {
        Ok(elements) => elements,
        Err(e) => {
          warn!(view_id = %view.id, error = %e, "Failed to fetch view elements, continuing without them");
          Vec::new()
        }
      };
    }

    let app_title = self.pipeline_settings(options).app_title;
    Ok(synthesize_navigation(&project_views, &self.config.navigation, &app_title))
  }
}
