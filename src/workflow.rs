//! Command entry points wiring the CLI to the workflow core.
//!
//! Each function drives one detail-view session: build the client, load the
//! store, apply the requested operation, print the outcome. Remote failures
//! surface exactly once; nothing retries.

use anyhow::{bail, Context, Result};
use std::io::{BufRead, Write};
use std::path::Path;

use crate::api::{HttpApi, ServiceConfig};
use crate::cli::{
    LoginArgs, ReportArgs, ReportFormat, ShowArgs, StepCommentArgs, StepPhotoArgs, StepStatusArgs,
    TransitionArgs,
};
use crate::editor::StepEditor;
use crate::report::{HtmlRenderer, Report, ReportRenderer, TextRenderer};
use crate::session::{Action, Session};
use crate::store::InspectionStore;
use crate::transition;

fn client(service_url: Option<&str>) -> HttpApi {
    HttpApi::new(ServiceConfig::from_env(service_url))
}

pub fn run_show(args: ShowArgs) -> Result<()> {
    let api = client(args.service_url.as_deref());
    let store = InspectionStore::load(&api, args.inspection)?;
    print_detail(&store);
    Ok(())
}

fn print_detail(store: &InspectionStore) {
    let inspection = &store.inspection;
    println!("Inspection #{}: {}", inspection.id, inspection.title);
    println!("Anlage: {}", inspection.plant_name);
    println!("Status: {}", inspection.status.label());
    if let Some(started) = inspection.started_at.as_deref() {
        println!("Beginn: {started}");
    }
    if let Some(finished) = inspection.finished_at.as_deref() {
        println!("Ende: {finished}");
    }
    if let Some(comment) = inspection.general_comment.as_deref() {
        println!("Allgemeiner Kommentar: {comment}");
    }
    if let Some(warning) = store.steps_warning.as_deref() {
        println!("Warnung: Steps konnten nicht geladen werden ({warning})");
    }

    let actions: Vec<&str> = transition::offered(&inspection.status)
        .into_iter()
        .map(|transition| transition.name())
        .collect();
    println!("Verfügbare Übergänge: {}", actions.join(", "));
    let editable = inspection.status == crate::schema::InspectionStatus::InProgress;
    println!(
        "Steps: {} ({})",
        store.steps().len(),
        if editable { "editierbar" } else { "schreibgeschützt" }
    );
    for (index, entry) in store.steps().iter().enumerate() {
        let step = &entry.record;
        println!(
            "  {}. {} [{}]",
            index + 1,
            step.description(),
            step.status.label()
        );
        if let Some(comment) = step.comment.as_deref().filter(|text| !text.is_empty()) {
            println!("     Kommentar: {comment}");
        }
        if let Some(photo) = step.photo_path.as_deref() {
            println!("     Foto: {photo}");
        }
    }
    if crate::report::printable(&inspection.status) {
        println!("Bericht verfügbar: plantcheck report --inspection {}", inspection.id);
    }
}

pub fn run_transition(args: TransitionArgs) -> Result<()> {
    let api = client(args.service_url.as_deref());
    let mut store = InspectionStore::load(&api, args.inspection)?;
    transition::apply(&api, &mut store, args.action.into())?;
    println!(
        "Inspection #{} ist jetzt: {}",
        store.inspection.id,
        store.inspection.status.label()
    );
    Ok(())
}

pub fn run_step_status(args: StepStatusArgs) -> Result<()> {
    let api = client(args.service_url.as_deref());
    let mut store = InspectionStore::load(&api, args.inspection)?;
    let mut editor = StepEditor::new(&api, &mut store);
    editor.set_status(args.step, args.status.into())?;
    let entry = store
        .step(args.step)
        .context("updated step missing from store")?;
    println!(
        "Step {} ist jetzt: {}",
        args.step,
        entry.record.status.label()
    );
    Ok(())
}

pub fn run_step_comment(args: StepCommentArgs) -> Result<()> {
    let api = client(args.service_url.as_deref());
    let mut store = InspectionStore::load(&api, args.inspection)?;
    let mut editor = StepEditor::new(&api, &mut store);
    editor.edit_comment(args.step, &args.text)?;
    editor.save_comment(args.step)?;
    println!("Kommentar für Step {} gespeichert", args.step);
    Ok(())
}

pub fn run_step_photo(args: StepPhotoArgs) -> Result<()> {
    let api = client(args.service_url.as_deref());
    let mut store = InspectionStore::load(&api, args.inspection)?;
    let mut editor = StepEditor::new(&api, &mut store);
    editor.attach_photo(args.step, &args.file)?;
    let entry = store
        .step(args.step)
        .context("updated step missing from store")?;
    let photo = entry.record.photo_path.as_deref().unwrap_or("<unbekannt>");
    println!("Foto für Step {} gespeichert: {photo}", args.step);
    Ok(())
}

pub fn run_report(args: ReportArgs) -> Result<()> {
    let api = client(args.service_url.as_deref());
    let store = InspectionStore::load(&api, args.inspection)?;
    if !crate::report::printable(&store.inspection.status) {
        bail!(
            "report is only available for completed inspections (current status: {})",
            store.inspection.status.label()
        );
    }
    let report = Report::compile(&store.inspection, store.step_records(), api.base_url());
    let rendered = match args.format {
        ReportFormat::Html => HtmlRenderer.render(&report),
        ReportFormat::Text => TextRenderer.render(&report),
    };
    match &args.out {
        Some(out) => {
            write_staged(out, &rendered)?;
            println!("wrote {}", out.display());
        }
        None => print!("{rendered}"),
    }
    Ok(())
}

/// Stage the report next to its destination and persist atomically.
fn write_staged(out: &Path, content: &str) -> Result<()> {
    let parent = match out.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut staged = tempfile::NamedTempFile::new_in(parent).context("create staging file")?;
    staged
        .write_all(content.as_bytes())
        .context("write staged report")?;
    staged
        .persist(out)
        .with_context(|| format!("publish report to {}", out.display()))?;
    Ok(())
}

pub fn run_login(args: LoginArgs) -> Result<()> {
    let api = client(args.service_url.as_deref());
    let password = prompt_password()?;
    let session = Session::establish(&api, &args.username, &password)?;
    println!(
        "Angemeldet als {} (Rolle: {:?})",
        session.user.username, session.user.role
    );
    println!(
        "Inspektionen anlegen/löschen: {}",
        if session.permits(Action::CreateInspection) {
            "ja"
        } else {
            "nein"
        }
    );
    println!(
        "Inspektionen durchführen: {}",
        if session.permits(Action::EditSteps) {
            "ja"
        } else {
            "nein"
        }
    );
    Ok(())
}

fn prompt_password() -> Result<String> {
    eprint!("Passwort: ");
    std::io::stderr().flush().context("flush prompt")?;
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("read password from stdin")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
