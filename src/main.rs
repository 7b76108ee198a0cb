mod app;
mod event;
mod input;
mod ui;

use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph};

use flashdeck::config::Config;
use flashdeck::sink::CommandSpeaker;
use flashdeck::store::json_store::JsonStore;
use flashdeck::store::schema::ExportData;

use app::{App, Screen};
use event::{AppEvent, EventHandler};
use ui::components::card_form::CardFormView;
use ui::components::card_panel::CardPanel;
use ui::components::filter_bar::FilterBar;
use ui::components::progress_bar::ProgressBar;
use ui::components::stats_panel::StatsPanel;
use ui::components::toast::ToastStack;
use ui::layout::{AppLayout, centered_rect, pack_hint_lines};
use ui::theme::Theme;

#[derive(Parser)]
#[command(name = "flashdeck", version, about = "Terminal vocabulary flashcards")]
struct Cli {
    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(short, long, help = "Directory holding the deck files")]
    data_dir: Option<PathBuf>,

    #[arg(short, long, help = "Start in study mode")]
    study: bool,

    #[arg(long, value_name = "FILE", help = "Write deck and stats to FILE and exit")]
    export: Option<PathBuf>,

    #[arg(long, value_name = "FILE", help = "Replace deck and stats from FILE and exit")]
    import: Option<PathBuf>,

    #[arg(long, help = "List bundled themes and exit")]
    list_themes: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.list_themes {
        for name in Theme::available_themes() {
            println!("{name}");
        }
        return Ok(());
    }

    let mut config = Config::load().unwrap_or_else(|e| {
        eprintln!("Ignoring unreadable config: {e}");
        Config::default()
    });
    if let Some(theme) = cli.theme {
        config.theme = theme;
    }
    if let Some(dir) = cli.data_dir {
        config.data_dir = Some(dir);
    }
    config.validate();

    let data_dir = config.data_dir();
    let store = JsonStore::with_base_dir(data_dir.clone())
        .with_context(|| format!("cannot use data directory {}", data_dir.display()))?;
    if let Err(e) = init_logging(&data_dir) {
        eprintln!("Logging disabled: {e:#}");
    }

    if store.recover_interrupted_save() {
        log::warn!("restored deck files from an interrupted save");
    }

    if let Some(path) = cli.export {
        return export_deck(&store, &path);
    }
    if let Some(path) = cli.import {
        return import_deck(&store, &path);
    }

    let theme = Theme::load(&config.theme).unwrap_or_else(|| {
        log::warn!("unknown theme {:?}, using default", config.theme);
        Theme::default()
    });
    let speaker = CommandSpeaker::new(config.speech_command.as_deref());
    let mut app = App::new(&config, theme, Box::new(store), Box::new(speaker));
    if cli.study {
        app.session.start_study_mode();
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(Duration::from_millis(50));

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = app.session.save() {
        eprintln!("Could not save on exit: {e}");
    }
    if let Err(err) = result {
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

/// Logs go to a file so they never interleave with the UI.
fn init_logging(data_dir: &Path) -> Result<()> {
    let path = data_dir.join("flashdeck.log");
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("cannot open {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .format_timestamp_secs()
        .try_init()?;
    Ok(())
}

fn export_deck(store: &JsonStore, path: &Path) -> Result<()> {
    let data = store.export_all()?;
    let json = serde_json::to_string_pretty(&data)?;
    fs::write(path, json).with_context(|| format!("cannot write {}", path.display()))?;
    println!(
        "Exported {} flashcards to {}",
        data.flashcards.len(),
        path.display()
    );
    Ok(())
}

fn import_deck(store: &JsonStore, path: &Path) -> Result<()> {
    let content =
        fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))?;
    let data: ExportData = serde_json::from_str(&content)
        .with_context(|| format!("{} is not a flashdeck export", path.display()))?;
    store.import_all(&data)?;
    println!(
        "Imported {} flashcards from {}",
        data.flashcards.len(),
        path.display()
    );
    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => app.handle_key(key),
            AppEvent::Tick => app.tick(Instant::now()),
            AppEvent::Resize => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    render_study(frame, app);

    match app.screen {
        Screen::Study => {}
        Screen::AddCard => {
            let popup = centered_rect(60, 60, area);
            frame.render_widget(CardFormView::new(&app.form, &app.theme), popup);
        }
        Screen::Stats => {
            let popup = centered_rect(40, 60, area);
            let stats = app.session.stats();
            frame.render_widget(Clear, popup);
            frame.render_widget(
                StatsPanel::new(&stats, app.session.cards(), &app.theme).detailed(true),
                popup,
            );
        }
        Screen::ConfirmDelete => render_confirm_delete(frame, app, area),
    }

    frame.render_widget(ToastStack::new(&app.toasts, &app.theme), area);
}

fn render_study(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;
    let layout = AppLayout::new(area);
    let view = app.session.view();
    let stats = app.session.stats();

    let mode = if view.study_mode { " Study mode " } else { " Browse " };
    let mut header_spans = vec![
        Span::styled(
            " flashdeck ",
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            mode,
            Style::default()
                .fg(if view.study_mode {
                    colors.success()
                } else {
                    colors.muted()
                })
                .bg(colors.header_bg()),
        ),
    ];
    if !layout.tier.show_sidebar() {
        header_spans.push(Span::styled(
            format!(
                "| {} words | streak {} | {}% ",
                stats.total_words, stats.streak, stats.accuracy
            ),
            Style::default().fg(colors.muted()).bg(colors.header_bg()),
        ));
    }
    let header =
        Paragraph::new(Line::from(header_spans)).style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, layout.header);

    frame.render_widget(
        FilterBar::new(app.session.criteria(), view.position.1, &app.theme)
            .editing(app.search.as_ref()),
        layout.filter_bar,
    );

    let (card_area, progress_area) = if layout.tier.show_progress_bar(area.height) {
        let split = ratatui::layout::Layout::default()
            .direction(ratatui::layout::Direction::Vertical)
            .constraints([
                ratatui::layout::Constraint::Min(5),
                ratatui::layout::Constraint::Length(3),
            ])
            .split(layout.main);
        (split[0], Some(split[1]))
    } else {
        (layout.main, None)
    };

    frame.render_widget(CardPanel::new(view, &app.theme), card_area);
    if let Some(progress_area) = progress_area {
        frame.render_widget(ProgressBar::for_position(view.position, &app.theme), progress_area);
    }
    if let Some(sidebar) = layout.sidebar {
        frame.render_widget(
            StatsPanel::new(&stats, app.session.cards(), &app.theme),
            sidebar,
        );
    }

    let hints: &[&str] = if app.search.is_some() {
        &["[Enter] Keep search", "[Esc] Clear search"]
    } else if view.feedback_available {
        &["[1] Easy", "[2] Medium", "[3] Hard", "[←/→] Move", "[Esc] Stop studying"]
    } else {
        &[
            "[←/→] Move",
            "[Space] Flip",
            "[Ctrl+N] Add",
            "[m] Study mode",
            "[s] Shuffle",
            "[/] Search",
            "[c] Category",
            "[d] Difficulty",
            "[r] Reset filters",
            "[p] Speak",
            "[i] Stats",
            "[x] Delete",
            "[q] Quit",
        ]
    };
    let lines: Vec<Line> = pack_hint_lines(hints, layout.footer.width as usize)
        .into_iter()
        .map(|l| Line::from(Span::styled(l, Style::default().fg(colors.muted()))))
        .collect();
    frame.render_widget(Paragraph::new(lines), layout.footer);
}

fn render_confirm_delete(frame: &mut ratatui::Frame, app: &App, area: Rect) {
    let colors = &app.theme.colors;
    let word = app.pending_delete_word().unwrap_or("this card");
    let popup = centered_rect(30, 20, area);
    let popup = Rect::new(popup.x, popup.y, popup.width, popup.height.min(7));

    frame.render_widget(Clear, popup);
    let body = Paragraph::new(vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("Delete ", Style::default().fg(colors.fg())),
            Span::styled(
                word,
                Style::default()
                    .fg(colors.card_front())
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("?", Style::default().fg(colors.fg())),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "[y] Delete  [n] Keep",
            Style::default().fg(colors.muted()),
        )),
    ])
    .alignment(ratatui::layout::Alignment::Center)
    .block(
        Block::bordered()
            .title(" Confirm ")
            .border_style(Style::default().fg(colors.error()))
            .style(Style::default().bg(colors.bg())),
    );
    frame.render_widget(body, popup);
}
