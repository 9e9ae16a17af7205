mod command;
mod helper;
mod logging;

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use rustyline::Editor;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;

use command::Command;
use datachat_application::ChatWidget;
use datachat_core::autocomplete::Segment;
use datachat_core::backend::{FaqCatalog, Settings};
use datachat_core::{Message, MessageRole, WidgetConfig};
use datachat_infrastructure::ConfigService;
use datachat_interaction::HttpQueryBackend;
use helper::CliHelper;
use uuid::Uuid;

/// Terminal host for the Datachat widget engine.
#[derive(Parser, Debug)]
#[command(name = "datachat", version, about = "Terminal host for the Datachat widget engine")]
struct Cli {
    /// Configuration file (defaults to the platform config directory)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// API base URL, overriding the config file and DATACHAT_API_BASE
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Directory for daily-rolling log files
    #[arg(long, value_name = "DIR")]
    log_dir: Option<PathBuf>,
}

fn load_config(cli: &Cli) -> Result<WidgetConfig> {
    let mut service = ConfigService::new();
    if let Some(path) = &cli.config {
        service = service.with_path(path);
    }
    if cli.base_url.is_some() {
        service = service.with_base_url_override(cli.base_url.clone());
    }
    let mut config = service
        .get_config()
        .context("Failed to load configuration")?;
    if let Some(dir) = &cli.log_dir {
        config.log_dir = Some(dir.clone());
    }
    Ok(config)
}

/// Terminal session state layered over the widget.
struct Repl {
    widget: ChatWidget,
    /// Messages already printed. Placeholders are removed and answers
    /// appended in their place, so positions are not stable.
    shown: HashSet<Uuid>,
    /// Last listed FAQ entries, in display order.
    faq_listing: Vec<String>,
}

impl Repl {
    fn new(widget: ChatWidget) -> Self {
        Self {
            widget,
            shown: HashSet::new(),
            faq_listing: Vec::new(),
        }
    }

    /// Messages not printed yet, in conversation order. Marks them printed.
    fn take_unshown(&mut self) -> Vec<Message> {
        let fresh: Vec<Message> = self
            .widget
            .messages()
            .iter()
            .filter(|m| !self.shown.contains(&m.id))
            .cloned()
            .collect();
        self.shown.extend(fresh.iter().map(|m| m.id));
        fresh
    }

    fn print_new_messages(&mut self) {
        for message in self.take_unshown() {
            match message.role {
                MessageRole::User => println!("{}", format!("> {}", message.text).green()),
                MessageRole::Assistant if message.is_loading() => {
                    println!("{}", message.text.bright_black())
                }
                MessageRole::Assistant => {
                    for line in message.text.lines() {
                        println!("{}", line.bright_blue());
                    }
                    if let Some(value) = message.numeric_value() {
                        println!("{}", format!("  = {}", value).bright_black());
                    }
                }
            }
        }
    }

    fn print_surface(&self) {
        let coordinator = self.widget.coordinator();
        if let Some(chips) = coordinator.visible_chips() {
            println!("{}", "Suggestions:".bright_yellow());
            for (i, chip) in chips.iter().enumerate() {
                println!("  {}", format!("[{}] {}", i + 1, chip).yellow());
            }
        } else if let Some(query) = coordinator.autocomplete() {
            println!("{}", "Completions:".bright_yellow());
            for (i, segments) in query.rendered().iter().enumerate() {
                let line: String = segments
                    .iter()
                    .map(|segment| match segment {
                        Segment::Plain(text) => text.normal().to_string(),
                        Segment::Match(text) => text.bold().yellow().to_string(),
                    })
                    .collect();
                let marker = if query.highlight == Some(i) { ">" } else { " " };
                println!(" {}{} {}", marker, i + 1, line);
            }
        } else {
            println!("{}", "(no suggestions)".bright_black());
        }
    }

    fn print_faqs(&mut self, catalog: &FaqCatalog) {
        self.faq_listing.clear();
        let sections = [
            ("Basic", &catalog.basic),
            ("Intermediate", &catalog.intermediate),
            ("Advanced", &catalog.advanced),
            ("Operational", &catalog.operational),
        ];
        for (title, questions) in sections {
            if questions.is_empty() {
                continue;
            }
            println!("{}", title.bright_magenta().bold());
            for question in questions {
                self.faq_listing.push(question.clone());
                println!("  {}", format!("{}. {}", self.faq_listing.len(), question).yellow());
            }
        }
    }

    fn print_settings(settings: Option<&Settings>) {
        let settings = settings.cloned().unwrap_or_default();
        let show = |value: Option<String>| value.unwrap_or_else(|| "(not set)".into());
        println!("{}", "Settings".bright_magenta().bold());
        println!("  download_path:     {}", show(settings.download_path));
        println!("  files_folder_path: {}", show(settings.files_folder_path));
    }

    fn last_answer_id(&self) -> Option<Uuid> {
        self.widget
            .messages()
            .iter()
            .rev()
            .find(|m| m.role == MessageRole::Assistant && !m.is_loading())
            .map(|m| m.id)
    }

    fn selected(&self, text: Option<String>) {
        match text {
            Some(text) => {
                println!("{}", format!("Input: {}", text).bright_cyan());
                println!("{}", "Press Enter on an empty line to send it.".bright_black());
            }
            None => println!("{}", "Nothing to pick at that position.".yellow()),
        }
    }

    /// Runs one command. Returns `false` when the REPL should exit.
    async fn run(&mut self, command: Command) -> bool {
        match command {
            Command::Quit => return false,
            Command::Send(text) => {
                if self.widget.send_text(&text).is_some() {
                    self.print_new_messages();
                    self.widget.settle().await;
                    self.print_new_messages();
                    self.print_surface();
                }
            }
            Command::Complete(text) => {
                self.widget.input(&text);
                self.widget.settle().await;
                self.print_surface();
            }
            Command::Pick(n) => {
                let picked = self.widget.click_chip(n - 1);
                self.selected(picked);
            }
            Command::Faqs => {
                let catalog = self.widget.load_faqs().await.clone();
                self.print_faqs(&catalog);
            }
            Command::Faq(n) => match self.faq_listing.get(n - 1).cloned() {
                Some(question) => {
                    let picked = self.widget.click_faq(&question);
                    self.selected(picked);
                }
                None => println!("{}", "Run :faqs first, then pick a listed number.".yellow()),
            },
            Command::Edit(text) => match self.last_answer_id() {
                Some(id) => match self.widget.edit_answer(id, &text).await {
                    Ok(()) => println!("{}", "Answer updated.".bright_green()),
                    Err(e) => eprintln!("{}", format!("Edit failed: {}", e).red()),
                },
                None => println!("{}", "No answer to edit yet.".yellow()),
            },
            Command::Download(filename) => match self.last_answer_id() {
                Some(id) => match self.widget.download_answer(id, filename).await {
                    Ok(receipt) => println!(
                        "{}",
                        format!("{} ({})", receipt.message, receipt.file_path).bright_green()
                    ),
                    Err(e) => eprintln!("{}", format!("Download failed: {}", e).red()),
                },
                None => println!("{}", "No answer to download yet.".yellow()),
            },
            Command::Settings(None) => {
                self.widget.open_settings();
                Self::print_settings(self.widget.settings());
                self.widget.close_settings();
            }
            Command::Settings(Some(path)) => {
                let mut settings = self.widget.settings().cloned().unwrap_or_default();
                settings.download_path = Some(path);
                match self.widget.update_settings(settings).await {
                    Ok(updated) => {
                        println!("{}", updated.message.bright_green());
                        Self::print_settings(Some(&updated.settings));
                    }
                    Err(e) => eprintln!("{}", format!("Settings update failed: {}", e).red()),
                }
            }
            Command::Files => match self.widget.uploaded_files().await {
                Ok(listing) if listing.files.is_empty() => {
                    println!("{}", "No files uploaded.".bright_black())
                }
                Ok(listing) => {
                    for file in listing.files {
                        println!(
                            "  {} {}",
                            file.filename.yellow(),
                            format!("({} bytes)", file.size).bright_black()
                        );
                    }
                }
                Err(e) => eprintln!("{}", format!("Failed to list files: {}", e).red()),
            },
            Command::Training => match self.widget.training().await {
                Ok(data) => {
                    println!("{}", format!("{} training entries", data.count).bright_magenta());
                    for (question, answer) in &data.training_data {
                        println!("  {}", question.yellow());
                        println!("    {}", answer.bright_blue());
                    }
                }
                Err(e) => eprintln!("{}", format!("Failed to load training data: {}", e).red()),
            },
            Command::Teach => {
                let pair = self.last_answer_id().and_then(|id| {
                    self.widget
                        .conversation()
                        .answer_pair(id)
                        .ok()
                        .filter(|pair| !pair.question.is_empty())
                });
                match pair {
                    Some(pair) => {
                        match self.widget.add_training(&pair.question, &pair.answer).await {
                            Ok(()) => println!("{}", "Training entry saved.".bright_green()),
                            Err(e) => eprintln!("{}", format!("Training failed: {}", e).red()),
                        }
                    }
                    None => println!("{}", "No answered question to teach yet.".yellow()),
                }
            }
            Command::Minimize => {
                self.widget.minimize();
                println!("{}", "Widget minimized.".bright_black());
            }
            Command::Restore => {
                self.widget.restore();
                self.print_surface();
            }
            Command::Fullscreen => {
                let on = self.widget.toggle_fullscreen();
                println!(
                    "{}",
                    format!("Fullscreen {}", if on { "on" } else { "off" }).bright_black()
                );
            }
            Command::Help => print_help(),
        }
        true
    }
}

fn print_help() {
    println!("{}", "Type a question to send it. Commands:".bright_black());
    for (cmd, about) in [
        (":complete TEXT", "show autocomplete results for TEXT"),
        (":pick N", "put suggestion chip N into the input"),
        (":faqs / :faq N", "list FAQs / pick FAQ N"),
        (":edit TEXT", "replace the last answer"),
        (":download [NAME]", "save the last answer"),
        (":settings [PATH]", "show settings / set the download path"),
        (":files / :training", "list uploaded files / training entries"),
        (":teach", "save the last answer as a training entry"),
        (":minimize / :restore / :fullscreen", "window state"),
        (":quit", "exit"),
    ] {
        println!("  {} {}", cmd.bright_cyan(), about.bright_black());
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let _log_guard = logging::init_tracing(config.log_dir.as_deref())?;

    tracing::info!("[Startup] Using API at {}", config.base_url);
    let backend = Arc::new(HttpQueryBackend::from_config(&config));
    let mut repl = Repl::new(ChatWidget::new(backend, config));

    println!("{}", "=== Datachat ===".bright_magenta().bold());
    let report = repl.widget.start().await;
    if !report.healthy {
        println!(
            "{}",
            "Backend health check failed; answers may be unavailable.".yellow()
        );
    }
    repl.print_new_messages();
    repl.print_surface();
    println!("{}", "Type ':help' for commands, ':quit' to exit.".bright_black());

    let mut rl: Editor<CliHelper, DefaultHistory> = Editor::new()?;
    rl.set_helper(Some(CliHelper::new()));

    // Text picked from a chip or FAQ waits in the widget input; an empty
    // line sends it.
    loop {
        match rl.readline(">> ") {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    if repl.widget.coordinator().input().trim().is_empty() {
                        continue;
                    }
                    if repl.widget.submit().is_some() {
                        repl.print_new_messages();
                        repl.widget.settle().await;
                        repl.print_new_messages();
                        repl.print_surface();
                    }
                    continue;
                }
                let _ = rl.add_history_entry(trimmed);

                match Command::parse(trimmed) {
                    Ok(command) => {
                        if !repl.run(command).await {
                            println!("{}", "Goodbye!".bright_green());
                            break;
                        }
                    }
                    Err(message) => println!("{}", message.yellow()),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type ':quit' to exit.".yellow());
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        }
    }

    repl.widget.shutdown();
    Ok(())
}
