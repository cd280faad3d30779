use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result, bail};
use estimate_core::contact::{ContactForm, submit_contact};
use estimate_core::db::{RepositoryRegistry, SyncReport, sync_offline_data};
use estimate_core::gallery::{GalleryFilter, ProjectGallery, default_catalog};
use estimate_core::wizard::{EstimateSession, StepValidationError, WizardStep};
use estimate_core::{EstimateRepository, Project, ProjectType, SaveOutcome, Timeline};
use estimate_data::ProjectCatalogLoader;
use estimate_db_local::LocalRepositoryFactory;
use estimate_db_sqlite::SqliteRepositoryFactory;
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::render;

/// Registry with every backend this binary ships.
pub fn build_registry() -> RepositoryRegistry {
    let mut registry = RepositoryRegistry::new();
    registry.register(Box::new(SqliteRepositoryFactory));
    registry.register(Box::new(LocalRepositoryFactory));
    registry
}

/// Opens the store saves go to: the primary backed by the fallback, or
/// whichever of the two is available.
pub async fn open_store(
    registry: &RepositoryRegistry,
    config: &AppConfig,
) -> Result<Box<dyn EstimateRepository>> {
    let store = registry
        .create_with_fallback(&config.database.db_config(), &config.fallback.db_config())
        .await
        .context("no estimate store could be opened")?;
    debug!(backend = store.backend_name(), "store ready");
    Ok(store)
}

/// Wizard answers supplied up front, one per field.
#[derive(Debug, Clone, Default)]
pub struct EstimateInput {
    pub project_type: String,
    pub location: String,
    pub square_footage: String,
    pub stories: Option<String>,
    pub construction_type: Option<String>,
    pub special_requirements: Option<String>,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: Option<String>,
    pub timeline: String,
}

/// Fills every step from `input` and advances to the results step.
///
/// Stops at the first step that fails validation, leaving the session on it.
pub async fn run_scripted(
    session: &mut EstimateSession,
    input: &EstimateInput,
) -> Result<(), (WizardStep, StepValidationError)> {
    let draft = session.wizard_mut().draft_mut();

    let project_type = input.project_type.trim();
    draft.project_type = (!project_type.is_empty()).then(|| ProjectType::parse(project_type));
    draft.location = input.location.clone();
    draft.set_square_footage_input(&input.square_footage);
    draft.set_stories_input(input.stories.as_deref().unwrap_or("1"));
    draft.set_construction_type_input(input.construction_type.as_deref().unwrap_or_default());
    draft.special_requirements = input.special_requirements.clone().unwrap_or_default();
    draft.name = input.name.clone();
    draft.email = input.email.clone();
    draft.phone = input.phone.clone();
    draft.company = input.company.clone().unwrap_or_default();
    draft.timeline = Timeline::parse(&input.timeline);

    while !session.wizard().is_complete() {
        let step = session.wizard().step();
        session.next().await.map_err(|reason| (step, reason))?;
    }
    Ok(())
}

/// Shows the results step and saves the estimate.
pub async fn finish_estimate<W: Write>(
    session: &mut EstimateSession,
    store: &dyn EstimateRepository,
    out: &mut W,
) -> Result<SaveOutcome> {
    let wizard = session.wizard();
    let Some(estimate) = wizard.estimate() else {
        bail!("the estimate is not complete");
    };
    write!(out, "{}", render::render_estimate(wizard.record(), estimate))?;

    let outcome = session.submit(store).await;
    match (&outcome.id, &outcome.error) {
        (Some(id), _) if outcome.success => writeln!(out, "Saved as {id}.")?,
        (_, Some(message)) => writeln!(out, "{message}")?,
        _ => {}
    }
    Ok(outcome)
}

/// Validates and stores a contact form.
///
/// Field errors are listed on `out` and returned as the error; a storage
/// failure is reported in the outcome.
pub async fn run_contact<W: Write>(
    form: &ContactForm,
    store: &dyn EstimateRepository,
    out: &mut W,
) -> Result<SaveOutcome> {
    match submit_contact(form, store).await {
        Ok(outcome) => {
            if outcome.success {
                writeln!(out, "{}", form.kind.success_message())?;
            } else if let Some(message) = &outcome.error {
                writeln!(out, "{message}")?;
            }
            Ok(outcome)
        }
        Err(errors) => {
            for field_error in errors.errors() {
                writeln!(out, "  {field_error}")?;
            }
            Err(errors.into())
        }
    }
}

/// The catalog from a CSV file, or the built-in one.
pub fn load_catalog(path: Option<&Path>) -> Result<Vec<Project>> {
    let Some(path) = path else {
        return Ok(default_catalog());
    };
    let file = File::open(path)
        .with_context(|| format!("cannot open catalog '{}'", path.display()))?;
    let projects = ProjectCatalogLoader::load(file)
        .with_context(|| format!("invalid catalog '{}'", path.display()))?;
    info!(count = projects.len(), path = %path.display(), "catalog loaded");
    Ok(projects)
}

/// Lists the first `pages` pages of projects matching `filter`.
pub fn run_gallery<W: Write>(
    projects: Vec<Project>,
    filter: GalleryFilter,
    pages: usize,
    out: &mut W,
) -> Result<()> {
    let mut gallery = ProjectGallery::new(projects);
    gallery.set_filter(filter);
    while gallery.page() < pages && gallery.has_more() {
        gallery.load_more();
    }

    let visible = gallery.visible();
    if visible.is_empty() {
        writeln!(out, "No projects in this category.")?;
        return Ok(());
    }
    for project in visible {
        writeln!(out, "{}", render::render_project_line(project))?;
    }
    if gallery.has_more() {
        writeln!(
            out,
            "More projects available (--pages {}).",
            gallery.page() + 1
        )?;
    }
    Ok(())
}

/// Shows one project by id.
pub fn show_project<W: Write>(projects: Vec<Project>, id: &str, out: &mut W) -> Result<()> {
    let gallery = ProjectGallery::new(projects);
    let Some(project) = gallery.find(id) else {
        bail!("no project with id '{id}'");
    };
    write!(out, "{}", render::render_project(project))?;
    Ok(())
}

/// Copies records saved while offline into the primary store.
pub async fn run_sync(registry: &RepositoryRegistry, config: &AppConfig) -> Result<SyncReport> {
    if config.fallback.backend != "local" {
        bail!(
            "offline sync reads the local fallback store, but [fallback] backend is '{}'",
            config.fallback.backend
        );
    }

    let offline = LocalRepositoryFactory::open(&config.fallback.db_config())
        .await
        .context("cannot open the offline store")?;
    let primary = registry
        .create(&config.database.db_config())
        .await
        .context("cannot open the primary store")?;

    let report = sync_offline_data(&offline, primary.as_ref())
        .await
        .context("offline sync failed")?;
    if !report.is_complete() {
        warn!(remaining = report.remaining, "offline sync stopped early");
    }
    Ok(report)
}

/// Prints stored estimates and contact requests, newest first.
pub async fn run_list<W: Write>(store: &dyn EstimateRepository, out: &mut W) -> Result<()> {
    let estimates = store.list_estimates().await.context("cannot list estimates")?;
    let contacts = store.list_contacts().await.context("cannot list contacts")?;

    writeln!(out, "Estimates ({})", estimates.len())?;
    for stored in &estimates {
        writeln!(out, "  {}", render::render_stored_estimate(stored))?;
    }
    writeln!(out, "Contact requests ({})", contacts.len())?;
    for stored in &contacts {
        writeln!(out, "  {}", render::render_stored_contact(stored))?;
    }
    Ok(())
}
