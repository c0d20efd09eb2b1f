use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use lightmark_config::Config;
use lightmark_engine::{ClassifiedDoc, classify_lines, estimated_size, io, outer_markup};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};
use relative_path::RelativePathBuf;
use std::{
    env,
    io::stdout,
    path::{Path, PathBuf},
    process,
};

#[derive(Clone, Copy, PartialEq)]
enum ViewMode {
    Markup,
    Source,
}

struct App {
    library_path: PathBuf,
    files: Vec<RelativePathBuf>,
    file_list_state: ListState,
    view: ViewMode,
    source_lines: Vec<String>,
    doc: Option<ClassifiedDoc>,
    status: String,
}

impl App {
    fn new(library_path: PathBuf) -> Result<Self> {
        let files = list_library_files(&library_path)?;

        let mut app = Self {
            library_path,
            files,
            file_list_state: ListState::default(),
            view: ViewMode::Markup,
            source_lines: Vec::new(),
            doc: None,
            status: String::new(),
        };

        if !app.files.is_empty() {
            app.file_list_state.select(Some(0));
            app.load_selected_file();
        } else {
            app.status = "no .txt files in library".to_string();
        }
        Ok(app)
    }

    fn next_file(&mut self) {
        if self.files.is_empty() {
            return;
        }
        let i = match self.file_list_state.selected() {
            Some(i) => (i + 1) % self.files.len(),
            None => 0,
        };
        self.file_list_state.select(Some(i));
        self.load_selected_file();
    }

    fn previous_file(&mut self) {
        if self.files.is_empty() {
            return;
        }
        let i = match self.file_list_state.selected() {
            Some(i) => {
                if i == 0 {
                    self.files.len() - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.file_list_state.select(Some(i));
        self.load_selected_file();
    }

    fn toggle_view(&mut self) {
        self.view = match self.view {
            ViewMode::Markup => ViewMode::Source,
            ViewMode::Source => ViewMode::Markup,
        };
    }

    fn load_selected_file(&mut self) {
        let Some(file) = self
            .file_list_state
            .selected()
            .and_then(|i| self.files.get(i))
        else {
            return;
        };

        match io::read_lines(file, &self.library_path) {
            Ok(lines) => {
                match classify_lines(&lines) {
                    Ok(doc) => {
                        self.status = describe_doc(&lines, &doc);
                        self.doc = Some(doc);
                    }
                    Err(e) => {
                        self.status = format!("error classifying document: {e}");
                        self.doc = None;
                    }
                }
                self.source_lines = lines;
            }
            Err(e) => {
                self.status = format!("error reading file: {e}");
                self.source_lines = Vec::new();
                self.doc = None;
            }
        }
    }

    fn preview_lines(&self) -> Vec<String> {
        match self.view {
            ViewMode::Source => self.source_lines.clone(),
            ViewMode::Markup => match &self.doc {
                Some(doc) => markup_preview(doc),
                None => Vec::new(),
            },
        }
    }
}

fn list_library_files(library_path: &Path) -> Result<Vec<RelativePathBuf>> {
    let files = io::scan_text_files(library_path)?;
    Ok(files
        .iter()
        .filter_map(|f| f.strip_prefix(library_path).ok())
        .map(|rel| RelativePathBuf::from(rel.to_string_lossy().as_ref()))
        .collect())
}

fn describe_doc(lines: &[String], doc: &ClassifiedDoc) -> String {
    match estimated_size(&doc.tree, doc.root) {
        Ok(size) => format!(
            "{} lines · {} nodes · ~{} bytes estimated",
            lines.len(),
            doc.tree.node_count(),
            size
        ),
        Err(e) => format!("error estimating size: {e}"),
    }
}

/// One display line per root child, wrapped in the root's own tag.
fn markup_preview(doc: &ClassifiedDoc) -> Vec<String> {
    let element = match doc.tree.get(doc.root) {
        Ok(node) => match node.as_element() {
            Some(element) => element,
            None => return vec!["document root is not an element".to_string()],
        },
        Err(e) => return vec![format!("render error: {e}")],
    };

    let name = element.tag().name();
    let mut lines = Vec::with_capacity(element.children().len() + 2);
    if element.classes().is_empty() {
        lines.push(format!("<{name}>"));
    } else {
        lines.push(format!(r#"<{name} class="{}">"#, element.classes().join(" ")));
    }
    for &child in element.children() {
        match outer_markup(&doc.tree, child) {
            Ok(markup) => lines.push(format!("  {markup}")),
            Err(e) => lines.push(format!("render error: {e}")),
        }
    }
    lines.push(format!("</{name}>"));
    lines
}

fn main() -> Result<()> {
    // Library path comes from the CLI argument, falling back to the config file
    let args: Vec<String> = env::args().collect();
    let config_path = Config::config_path();

    let library_path;
    let from_config;

    if args.len() == 2 {
        library_path = PathBuf::from(&args[1]);
        from_config = false;
    } else if args.len() == 1 {
        match Config::load() {
            Ok(Some(config)) => {
                library_path = config.library_path;
                from_config = true;
            }
            Ok(None) => {
                eprintln!("Error: no library path provided and no config file found");
                eprintln!("Usage: {} <library-folder-path>", args[0]);
                eprintln!("Or create a config file at {}", config_path.display());
                process::exit(1);
            }
            Err(e) => {
                eprintln!("Error: failed to load config file: {e}");
                eprintln!("Usage: {} <library-folder-path>", args[0]);
                process::exit(1);
            }
        }
    } else {
        eprintln!("Usage: {} [library-folder-path]", args[0]);
        process::exit(1);
    };

    if let Err(e) = io::validate_library_dir(&library_path) {
        let source = if from_config {
            format!(" from config file '{}'", config_path.display())
        } else {
            String::new()
        };
        eprintln!(
            "Error: library path '{}'{} is invalid: {e}",
            library_path.display(),
            source
        );
        process::exit(1);
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(library_path)?;
    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()>
where
    <B as ratatui::backend::Backend>::Error: Send + Sync + 'static,
{
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            match key.code {
                KeyCode::Char('q') => return Ok(()),
                KeyCode::Down | KeyCode::Char('j') => app.next_file(),
                KeyCode::Up | KeyCode::Char('k') => app.previous_file(),
                KeyCode::Char('m') => app.toggle_view(),
                _ => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(2)].as_ref())
        .split(f.area());

    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)].as_ref())
        .split(chunks[0]);

    let file_items: Vec<ListItem> = app
        .files
        .iter()
        .map(|file| ListItem::new(Line::from(file.as_str().to_string())))
        .collect();

    let files_list = List::new(file_items)
        .block(Block::default().borders(Borders::ALL).title("Library"))
        .highlight_style(Style::default().bg(Color::Yellow).fg(Color::Black));

    f.render_stateful_widget(files_list, panes[0], &mut app.file_list_state);

    let title = match app.view {
        ViewMode::Markup => "Markup",
        ViewMode::Source => "Source",
    };
    let preview = app.preview_lines();
    let content_text: Vec<Line> = if preview.is_empty() {
        vec![Line::from("Select a file to view it")]
    } else {
        preview.into_iter().map(Line::from).collect()
    };

    let content = Paragraph::new(content_text)
        .block(Block::default().borders(Borders::ALL).title(title))
        .wrap(Wrap { trim: false });

    f.render_widget(content, panes[1]);

    let help = Paragraph::new(vec![
        Line::from(app.status.clone()),
        Line::from(vec![
            Span::raw("q: Quit | "),
            Span::raw("↑/k: Previous | "),
            Span::raw("↓/j: Next | "),
            Span::raw("m: Toggle markup/source"),
        ]),
    ]);

    f.render_widget(help, chunks[1]);
}
