use std::io::{self, Write};
use std::sync::Arc;

use anyhow::Context;
use chrono::NaiveDate;
use practice_domain::{LogEntry, PracticeType, TimeRange};
use practice_workflow::onboarding::{InMemoryKeyValueStore, OnboardingTours, Tour};
use practice_workflow::projection;
use practice_workflow::{DraftField, EnrollmentWizard, PracticeTracker, WizardNav, WizardStep, WorkflowConfig};

/// Menú interactivo que recorre el ciclo de una práctica industrial en
/// memoria.
///
/// Opciones soportadas:
/// 1) Ver estado de la práctica
/// 2) Inscribir práctica (asistente de 4 pasos)
/// 3) Confirmar práctica (equivale al "SKIP" del supervisor)
/// 4) Agregar bitácora del día
/// 5) Terminar práctica
/// 6) Ver logs
/// 7) Ver resumen en JSON
/// 8) Salir
fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")))
        .init();

    let config = WorkflowConfig::from_env().context("configuración PRACTICAS_*")?;
    tracing::info!(?config, "configuración cargada");
    let mut tracker = PracticeTracker::in_memory(config.clone());
    let tours = OnboardingTours::new(Arc::new(InMemoryKeyValueStore::new()));

    loop {
        println!("\n== Mis Prácticas ==");
        println!("Práctica Industrial: {}", projection::status_label(tracker.record()?.as_ref()));
        println!("1) Ver estado de la práctica");
        println!("2) Inscribir práctica");
        println!("3) Confirmar práctica (SKIP)");
        println!("4) Agregar bitácora del día");
        println!("5) Terminar práctica");
        println!("6) Ver logs");
        println!("7) Ver resumen en JSON");
        println!("8) Salir");
        let choice = prompt("Elige una opción: ")?;
        match choice.trim() {
            "1" => {
                if tours.should_show(Tour::PracticeDetails)? {
                    println!("(Tip) Aquí verás el estado, tu última bitácora y las pestañas de la práctica.");
                    tours.dismiss(Tour::PracticeDetails)?;
                }
                print_details(&tracker)?;
            }
            "2" => {
                if tours.should_show(Tour::Enrollment)? {
                    println!("(Tip) La inscripción tiene 4 pasos: Tipo, Categoría, Requisitos y Datos.");
                    tours.dismiss(Tour::Enrollment)?;
                }
                let mut wizard = EnrollmentWizard::new(config.clone());
                if run_wizard(&mut wizard)? {
                    match tracker.submit_enrollment(&mut wizard) {
                        Ok(id) => println!("Práctica inscrita: {} (En Espera)", id),
                        Err(e) => eprintln!("No se pudo inscribir: {}", e),
                    }
                }
            }
            "3" => match tracker.confirm() {
                Ok(rec) => println!("Práctica confirmada; inicio {}",
                                    rec.start_date().map(projection::format_display_date).unwrap_or_default()),
                Err(e) => eprintln!("Error confirmando: {}", e),
            },
            "4" => {
                let day = prompt("Fecha (AAAA-MM-DD, enter para hoy): ")?;
                let date = if day.trim().is_empty() {
                    tracker.today()
                } else {
                    match NaiveDate::parse_from_str(day.trim(), "%Y-%m-%d") {
                        Ok(d) => d,
                        Err(_) => { eprintln!("Fecha inválida"); continue; }
                    }
                };
                let from = prompt_or("Desde las (enter para 08:00): ", "08:00")?;
                let to = prompt_or("Hasta las (enter para 17:00): ", "17:00")?;
                let range = match TimeRange::parse(&from, &to) {
                    Ok(r) => r,
                    Err(e) => { eprintln!("Horario inválido: {}", e); continue; }
                };
                let developed = prompt("Actividad desarrollada: ")?;
                let pending = prompt("Actividad pendiente: ")?;
                match tracker.add_log_entry(LogEntry::new(date, range, developed.trim(), pending.trim())) {
                    Ok(_) => println!("¡Bitácora añadida con éxito!"),
                    Err(e) => eprintln!("Error agregando bitácora: {}", e),
                }
            }
            "5" => match tracker.complete() {
                Ok(_) => println!("¡Práctica finalizada con éxito!"),
                Err(e) => eprintln!("Error terminando la práctica: {}", e),
            },
            "6" => {
                let lines = projection::activity_lines(&tracker.journal_entries()?);
                if lines.is_empty() {
                    println!("Sin registros");
                }
                for line in lines {
                    println!("{}\n    {}", line.message, line.timestamp);
                }
            }
            "7" => println!("{}", serde_json::to_string_pretty(&tracker.summary()?)?),
            "8" => break,
            other => println!("Opción no reconocida: {}", other),
        }
    }

    Ok(())
}

/// Recorre los pasos del asistente. Devuelve `false` si el alumno vuelve a
/// "Mis Prácticas" sin llegar al envío.
fn run_wizard(wizard: &mut EnrollmentWizard) -> anyhow::Result<bool> {
    loop {
        println!("\n-- Paso {} de 4: {} --", wizard.step().number(), wizard.step().name());
        match wizard.step() {
            WizardStep::Type => {
                let t = prompt("Tipo (1=Iniciar práctica, 2=Convalidar práctica, enter=volver): ")?;
                let practice_type = match t.trim() {
                    "" => {
                        if wizard.previous_step() == WizardNav::ExitToOverview {
                            return Ok(false);
                        }
                        continue;
                    }
                    "1" => PracticeType::Start,
                    "2" => PracticeType::Validate,
                    _ => { eprintln!("Tipo inválido"); continue; }
                };
                wizard.select_type(practice_type)?;
            }
            WizardStep::Category => {
                let allowed = wizard.snapshot().allowed_categories;
                for (i, c) in allowed.iter().enumerate() {
                    println!("{}) {}", i + 1, projection::category_label(*c));
                }
                let c = prompt("Categoría (enter=volver): ")?;
                if c.trim().is_empty() {
                    wizard.previous_step();
                    continue;
                }
                match c.trim().parse::<usize>().ok().and_then(|n| n.checked_sub(1)).and_then(|i| allowed.get(i)) {
                    Some(category) => {
                        if let Err(e) = wizard.select_category(*category) {
                            eprintln!("{}", e);
                        }
                    }
                    None => eprintln!("Categoría inválida"),
                }
            }
            WizardStep::Requirements => {
                println!("Requisitos: haber aprobado los ramos previos y contar con seguro escolar vigente.");
                let ok = prompt("¿Cumples los requisitos? (s/n, enter=volver): ")?;
                match ok.trim().to_lowercase().as_str() {
                    "" => {
                        wizard.previous_step();
                    }
                    "s" => {
                        wizard.acknowledge_requirements(true);
                        wizard.next_step()?;
                    }
                    _ => {
                        wizard.acknowledge_requirements(false);
                        if let Err(e) = wizard.next_step() {
                            eprintln!("{}", e);
                        }
                    }
                }
            }
            WizardStep::Data => {
                for field in DraftField::ALL {
                    let value = prompt(&format!("{}: ", field_label(field)))?;
                    wizard.update_draft_field(field, value.trim());
                }
                return Ok(true);
            }
        }
    }
}

fn field_label(field: DraftField) -> &'static str {
    match field {
        DraftField::CompanyName => "Nombre de la empresa",
        DraftField::CompanyAddress => "Dirección de la empresa",
        DraftField::CompanyTaxId => "RUT de la empresa",
        DraftField::SupervisorFirstName => "Nombre del supervisor",
        DraftField::SupervisorLastName => "Apellido del supervisor",
        DraftField::SupervisorEmail => "Correo del supervisor",
        DraftField::SupervisorPhone => "Teléfono del supervisor",
        DraftField::PracticeMode => "Modo de práctica (162 o 324 horas)",
        DraftField::Career => "Carrera",
        DraftField::Campus => "Sede",
        DraftField::StartDate => "Fecha de inicio (AAAA-MM-DD)",
        DraftField::EndDate => "Fecha de término (AAAA-MM-DD)",
        DraftField::TaskSummary => "Resumen de tareas",
        DraftField::SpecialConsideration => "Consideración especial",
    }
}

fn print_details(tracker: &PracticeTracker) -> anyhow::Result<()> {
    let summary = tracker.summary()?;
    println!("\nEstado: {}", summary.detail_status_label);
    if let Some(category) = &summary.category_label {
        println!("Categoría: {}", category);
    }
    if let Some(mode) = &summary.mode_label {
        println!("Modo: {}", mode);
    }
    println!("Progreso: {} Hr", summary.progress_hours);
    println!("Inicio: {}", summary.start_date.as_deref().unwrap_or("-"));
    println!("Término: {}", summary.end_date.as_deref().unwrap_or("-"));
    if let Some(company) = &summary.company {
        println!("Empresa: {} ({})",
                 company.name.as_deref().unwrap_or("-"),
                 company.tax_id.as_deref().unwrap_or("sin RUT"));
    }
    if let Some(supervisor) = &summary.supervisor {
        println!("Supervisor: {} <{}>",
                 supervisor.name.as_deref().unwrap_or("-"),
                 supervisor.email.as_deref().unwrap_or("-"));
    }
    println!("Información: {}", summary.info_message);
    if let Some(entry) = &summary.latest_log_entry {
        println!("Última bitácora: {} {}", projection::format_display_date(entry.date), entry.time_range.display());
        println!("  Actividad desarrollada: {}", entry.developed_activity);
        println!("  Actividad pendiente: {}", entry.pending_activity);
    }
    let tabs: Vec<&str> = summary.tabs.iter().map(|t| t.label()).collect();
    println!("Pestañas: {}", tabs.join(" | "));
    Ok(())
}

fn prompt(msg: &str) -> io::Result<String> {
    print!("{}", msg);
    io::stdout().flush()?;
    let mut s = String::new();
    io::stdin().read_line(&mut s)?;
    Ok(s)
}

fn prompt_or(msg: &str, default: &str) -> io::Result<String> {
    let s = prompt(msg)?;
    if s.trim().is_empty() {
        Ok(default.to_string())
    } else {
        Ok(s.trim().to_string())
    }
}
