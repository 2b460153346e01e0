use console::{measure_text_width, Style};

use crate::inventory::{Inventory, ScoreBand, Severity, INVENTORY_VERSION};
use crate::scoring::ScoreBreakdown;
use crate::settings::SinkBackend;
use crate::share::ShareTarget;
use crate::wizard::{SaveStatus, Wizard};

pub const TREE_BRANCH: char = '\u{251C}';
pub const TREE_END: char = '\u{2514}';
pub const TREE_HORIZ: char = '\u{2500}';
pub const TREE_VERT: char = '\u{2502}';

const TREE_PREFIX_WIDTH: usize = 4;
const VALUE_COLUMN: usize = 25;
const PROGRESS_WIDTH: usize = 30;

fn tree_branch() -> String {
    dim()
        .apply_to(format!("{}{}{} ", TREE_BRANCH, TREE_HORIZ, TREE_HORIZ))
        .to_string()
}

fn tree_end() -> String {
    dim()
        .apply_to(format!("{}{}{} ", TREE_END, TREE_HORIZ, TREE_HORIZ))
        .to_string()
}

fn tree_indent() -> String {
    dim().apply_to(format!("{}   ", TREE_VERT)).to_string()
}

fn tree_item(is_last: bool) -> String {
    if is_last {
        tree_end()
    } else {
        tree_branch()
    }
}

pub fn dim() -> Style {
    Style::new().dim()
}

fn blue() -> Style {
    Style::new().blue()
}

fn magenta() -> Style {
    Style::new().magenta()
}

fn cyan() -> Style {
    Style::new().cyan()
}

fn green() -> Style {
    Style::new().green()
}

fn red() -> Style {
    Style::new().red()
}

fn yellow() -> Style {
    Style::new().yellow()
}

fn bold() -> Style {
    Style::new().bold()
}

fn init_prefix() -> String {
    blue().apply_to("[INIT]").to_string()
}

fn sink_prefix() -> String {
    magenta().apply_to("[SINK]").to_string()
}

fn band_style(band: &ScoreBand) -> Style {
    match band.severity {
        Severity::Normal => green(),
        Severity::Mild => yellow(),
        Severity::Moderate => yellow().bold(),
        Severity::Severe => red(),
        Severity::ExtremelySevere => red().bold(),
    }
}

pub fn pad_label(label: &str, depth: usize) -> String {
    let prefix_width = depth * TREE_PREFIX_WIDTH;
    let target_width = VALUE_COLUMN.saturating_sub(prefix_width);
    let current_width = measure_text_width(label);
    if current_width < target_width {
        format!("{}{}", label, " ".repeat(target_width - current_width))
    } else {
        format!("{} ", label)
    }
}

pub fn progress_bar(current: usize, total: usize) -> String {
    let filled = if total == 0 {
        0
    } else {
        (current * PROGRESS_WIDTH / total).min(PROGRESS_WIDTH)
    };
    format!(
        "{}{}",
        cyan().apply_to("\u{2588}".repeat(filled)),
        dim().apply_to("\u{2591}".repeat(PROGRESS_WIDTH - filled))
    )
}

pub fn log_newline() {
    println!();
}

pub fn log_startup_config(backend: SinkBackend, target: &str, share_url: &str) {
    println!(
        "{} hamilton-stress (inventory v{})",
        init_prefix(),
        INVENTORY_VERSION
    );
    println!(
        "{}{} {}",
        tree_branch(),
        pad_label("results backend", 1),
        cyan().apply_to(backend)
    );
    println!(
        "{}{} {}",
        tree_branch(),
        pad_label("target", 1),
        dim().apply_to(if target.is_empty() { "-" } else { target })
    );
    println!(
        "{}{} {}",
        tree_end(),
        pad_label("share url", 1),
        dim().apply_to(share_url)
    );
}

pub fn log_sink_error(error: &str) {
    println!(
        "{} {} {}",
        sink_prefix(),
        red().apply_to("unavailable:"),
        dim().apply_to(error)
    );
}

pub fn log_probe(reachable: bool) {
    println!(
        "{} store is {}.",
        sink_prefix(),
        if reachable {
            green().apply_to("reachable")
        } else {
            yellow().apply_to("unreachable")
        }
    );
}

pub fn log_intro() {
    println!(
        "{}",
        bold().apply_to(format!(
            "Test de Estrés de {}",
            cyan().apply_to("Hamilton")
        ))
    );
    log_newline();
    println!(
        "{}",
        dim().apply_to(
            "Mide tu salud emocional. Un análisis de 20 preguntas para entender tu nivel de ansiedad actual."
        )
    );
    log_newline();
    println!(
        "{}",
        dim().apply_to("Valoración privada. No es un diagnóstico clínico.")
    );
    log_newline();
}

pub fn log_name_prompt() {
    print!("{} ", bold().apply_to("Escribe tu nombre:"));
}

pub fn log_question(wizard: &Wizard) {
    let (Some(question), Some(progress)) = (wizard.current_question(), wizard.progress()) else {
        return;
    };

    println!(
        "{}  {} {}",
        progress_bar(progress.current, progress.total),
        bold().apply_to(progress.current),
        dim().apply_to(format!("/ {}  {}%", progress.total, progress.percent()))
    );
    log_newline();
    println!("{}", bold().apply_to(question.text));
    log_newline();

    let selected = wizard.current_answer();
    let options = wizard.inventory().options();
    for option in options {
        let is_selected = selected == Some(option.value);
        let marker = if is_selected { "(\u{25CF})" } else { "( )" };
        let line = format!("{} {}  {}", marker, option.value, option.label);
        if is_selected {
            println!("  {}", cyan().bold().apply_to(line));
        } else {
            println!("  {}", line);
        }
    }
    log_newline();

    let next_label = if wizard.is_last_question() {
        "resultados"
    } else {
        "siguiente"
    };
    println!(
        "{}",
        dim().apply_to(format!(
            "[1-{}] responder  [n] {}  [p] atrás  [q] cerrar test",
            options.len(),
            next_label
        ))
    );
}

pub fn log_results(wizard: &Wizard) {
    let Some(result) = wizard.result() else {
        return;
    };
    let inventory = wizard.inventory();
    let band = wizard.band();
    let style = band_style(band);

    println!("{}", bold().apply_to("TU VALORACIÓN"));
    println!(
        "{}{} {}{}",
        tree_branch(),
        pad_label("puntuación", 1),
        style.apply_to(result.total_score),
        dim().apply_to(format!("/{}", inventory.max_score()))
    );
    println!(
        "{}{} {}",
        tree_end(),
        pad_label("nivel", 1),
        style.apply_to(&result.band_label)
    );
    log_newline();

    println!(
        "{}",
        bold().apply_to(format!("ANÁLISIS PARA {}", result.subject_name.to_uppercase()))
    );
    println!(
        "Según el Inventario de Hamilton, tu nivel de ansiedad es {}.",
        style.apply_to(result.band_label.to_lowercase())
    );
    let count = band.guidance.len();
    for (i, guidance) in band.guidance.iter().enumerate() {
        println!(
            "{}{} {}",
            tree_item(i + 1 == count),
            bold().apply_to(i + 1),
            guidance
        );
    }
    log_newline();

    log_save_status(wizard.save_status());
    log_newline();
    println!(
        "{}",
        dim().apply_to("[s] guardar  [w] whatsapp  [c] copiar enlace  [r] reiniciar  [q] salir")
    );
}

pub fn log_save_status(status: &SaveStatus) {
    let line = match status {
        SaveStatus::Idle => dim().apply_to("sin guardar".to_string()),
        SaveStatus::Saving => yellow().apply_to("procesando...".to_string()),
        SaveStatus::Saved => green().bold().apply_to("¡resultado guardado!".to_string()),
        SaveStatus::Failed(reason) => red().apply_to(format!("no se pudo guardar: {reason}")),
    };
    println!("{}{} {}", tree_end(), pad_label("estado", 1), line);
}

pub fn log_share(target: ShareTarget, payload: &str) {
    let label = match target {
        ShareTarget::WhatsApp => "abre este enlace para compartir:",
        ShareTarget::CopyLink => "enlace copiado:",
    };
    println!("{} {}", green().apply_to(label), cyan().apply_to(payload));
}

fn breakdown_summary(breakdown: &ScoreBreakdown) -> String {
    format!(
        "{} answered, {} reverse-scored",
        breakdown.contributions.len(),
        breakdown.reversed_count()
    )
}

pub fn log_breakdown(breakdown: &ScoreBreakdown, inventory: &Inventory) {
    println!("{}", bold().apply_to("ITEMS"));
    let count = breakdown.contributions.len();
    for (i, contribution) in breakdown.contributions.iter().enumerate() {
        let reversed = if contribution.reversed {
            format!(" {}", yellow().apply_to("(reversed)"))
        } else {
            String::new()
        };
        let text = inventory
            .question(contribution.question_id)
            .map(|q| q.text)
            .unwrap_or_default();
        println!(
            "{}{} {} {}{}",
            tree_item(i + 1 == count),
            pad_label(&format!("#{:02} = {}", contribution.question_id, contribution.value), 1),
            bold().apply_to(format!("+{}", contribution.points)),
            dim().apply_to(text),
            reversed
        );
    }

    println!("{}{}", tree_indent(), dim().apply_to(breakdown_summary(breakdown)));

    if !breakdown.skipped.is_empty() {
        let skipped: Vec<String> = breakdown.skipped.iter().map(|id| id.to_string()).collect();
        println!(
            "{}{}",
            tree_indent(),
            dim().apply_to(format!("skipped unknown ids: {}", skipped.join(", ")))
        );
    }
}

pub fn log_band(score: u32, band: &ScoreBand, inventory: &Inventory) {
    let style = band_style(band);
    println!("{}", bold().apply_to("RESULT"));
    println!(
        "{}{} {}{}",
        tree_branch(),
        pad_label("score", 1),
        style.apply_to(score),
        dim().apply_to(format!("/{}", inventory.max_score()))
    );
    println!(
        "{}{} {} {}",
        tree_branch(),
        pad_label("band", 1),
        style.apply_to(band.label),
        dim().apply_to(format!("({}, <= {})", band.severity, band.upper_bound))
    );
    println!("{}{}", tree_end(), pad_label("guidance", 1));
    let count = band.guidance.len();
    for (i, guidance) in band.guidance.iter().enumerate() {
        println!("    {}{}", tree_item(i + 1 == count), guidance);
    }
}

pub fn log_generic_error(prefix: &str, error: &str) {
    eprintln!("{} {}", red().apply_to(prefix), error);
}
