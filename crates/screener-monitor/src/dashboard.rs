//! TUI dashboard for scan results.

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Cell, Chart, Dataset, GraphType, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use std::io::{self, Stdout};
use std::time::Duration;

use screener_scan::{ScanReport, ScanResult};

/// Selection state over the rows of a report.
pub struct DashboardState<'a> {
    report: &'a ScanReport,
    rows: Vec<&'a ScanResult>,
    table: TableState,
}

impl<'a> DashboardState<'a> {
    /// Rows are the candidates, or every scored ticker with `show_all`.
    pub fn new(report: &'a ScanReport, show_all: bool) -> Self {
        let rows: Vec<&ScanResult> = if show_all {
            report.results.iter().collect()
        } else {
            report.candidates().collect()
        };
        let mut table = TableState::default();
        if !rows.is_empty() {
            table.select(Some(0));
        }
        Self { report, rows, table }
    }

    pub fn rows(&self) -> &[&'a ScanResult] {
        &self.rows
    }

    pub fn selected(&self) -> Option<&'a ScanResult> {
        self.table.selected().and_then(|i| self.rows.get(i).copied())
    }

    pub fn next(&mut self) {
        if self.rows.is_empty() {
            return;
        }
        let i = self.table.selected().map_or(0, |i| (i + 1) % self.rows.len());
        self.table.select(Some(i));
    }

    pub fn previous(&mut self) {
        if self.rows.is_empty() {
            return;
        }
        let i = self
            .table
            .selected()
            .map_or(0, |i| if i == 0 { self.rows.len() - 1 } else { i - 1 });
        self.table.select(Some(i));
    }
}

fn enter_terminal() -> io::Result<Terminal<CrosstermBackend<Stdout>>> {
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    Terminal::new(CrosstermBackend::new(stdout))
}

/// Run `setup`; if it fails, run `restore` before returning the error.
fn setup_or_restore<T>(
    setup: impl FnOnce() -> io::Result<T>,
    restore: impl FnOnce(),
) -> io::Result<T> {
    setup().map_err(|e| {
        restore();
        e
    })
}

/// TUI Dashboard.
pub struct Dashboard {
    poll_ms: u64,
}

impl Dashboard {
    /// Create a new dashboard.
    pub fn new(poll_ms: u64) -> Self {
        Self { poll_ms }
    }

    /// Show the report until `q` or `Esc`.
    pub fn run(&self, report: &ScanReport, show_all: bool) -> io::Result<()> {
        // Setup terminal
        enable_raw_mode()?;
        let mut terminal = setup_or_restore(enter_terminal, || {
            let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
            let _ = disable_raw_mode();
        })?;

        let mut state = DashboardState::new(report, show_all);
        let res = self.run_loop(&mut terminal, &mut state);

        // Restore terminal
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;

        res
    }

    fn run_loop<B: Backend>(&self, terminal: &mut Terminal<B>, state: &mut DashboardState<'_>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.ui(f, state))?;

            if event::poll(Duration::from_millis(self.poll_ms))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    match key.code {
                        KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                        KeyCode::Down | KeyCode::Char('j') => state.next(),
                        KeyCode::Up | KeyCode::Char('k') => state.previous(),
                        _ => {}
                    }
                }
            }
        }
    }

    fn ui(&self, frame: &mut Frame, state: &mut DashboardState<'_>) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Length(3),      // Header
                Constraint::Min(8),         // Results
                Constraint::Percentage(35), // Chart
                Constraint::Length(6),      // Skipped
            ])
            .split(frame.area());

        self.render_header(frame, chunks[0], state);
        self.render_results(frame, chunks[1], state);
        self.render_chart(frame, chunks[2], state);
        self.render_skipped(frame, chunks[3], state);
    }

    fn render_header(&self, frame: &mut Frame, area: Rect, state: &DashboardState<'_>) {
        let report = state.report;
        let header = Paragraph::new(vec![Line::from(vec![
            Span::styled("Screener", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" | "),
            Span::styled(report.profile.clone(), Style::default().fg(Color::Cyan)),
            Span::raw(format!(
                " on {} | {} candidates of {} scanned | ↑/↓ select, 'q' quit",
                report.universe,
                report.candidates().count(),
                report.scanned
            )),
        ])])
        .block(Block::default().borders(Borders::ALL).title("Scan"));
        frame.render_widget(header, area);
    }

    fn render_results(&self, frame: &mut Frame, area: Rect, state: &mut DashboardState<'_>) {
        if state.rows.is_empty() {
            let empty = Paragraph::new("No candidates matched the screening criteria.")
                .block(Block::default().borders(Borders::ALL).title("Results"));
            frame.render_widget(empty, area);
            return;
        }

        let header_cells = ["Ticker", "Close", "Score", "RSI", "Hist", "SMA20", "SMA50", "Buy", "Stop", "Target", "R/R"]
            .iter()
            .map(|h| Cell::from(*h).style(Style::default().add_modifier(Modifier::BOLD)));
        let header = Row::new(header_cells).height(1);

        let rows = state.rows.iter().map(|r| {
            let color = if r.passed { Color::Green } else { Color::DarkGray };
            let ind = &r.indicators;
            let (buy, stop, target, rr) = match &r.levels {
                Some(l) => (
                    l.buy.to_string(),
                    l.stop_loss.to_string(),
                    l.target.to_string(),
                    l.reward_risk.to_string(),
                ),
                None => ("-".into(), "-".into(), "-".into(), "-".into()),
            };

            Row::new(vec![
                Cell::from(r.ticker.as_str().to_string()).style(Style::default().fg(color)),
                Cell::from(format!("{:.2}", r.close)),
                Cell::from(format!("{}/{}", r.scores.technical, r.scores.fundamental)),
                Cell::from(opt(ind.rsi, 1)),
                Cell::from(opt(ind.macd.map(|m| m.histogram), 2)),
                Cell::from(opt(ind.sma_20, 2)),
                Cell::from(opt(ind.sma_50, 2)),
                Cell::from(buy),
                Cell::from(stop),
                Cell::from(target),
                Cell::from(rr),
            ])
        });

        let table = Table::new(
            rows,
            [
                Constraint::Length(14),
                Constraint::Length(10),
                Constraint::Length(6),
                Constraint::Length(6),
                Constraint::Length(8),
                Constraint::Length(10),
                Constraint::Length(10),
                Constraint::Length(10),
                Constraint::Length(10),
                Constraint::Length(10),
                Constraint::Length(5),
            ],
        )
        .header(header)
        .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .block(Block::default().borders(Borders::ALL).title("Results"));

        frame.render_stateful_widget(table, area, &mut state.table);
    }

    fn render_chart(&self, frame: &mut Frame, area: Rect, state: &DashboardState<'_>) {
        let Some(selected) = state.selected() else {
            frame.render_widget(Block::default().borders(Borders::ALL).title("Chart"), area);
            return;
        };

        let chart_data = &selected.chart;
        let closes = chart_data.close_points();
        let sma_20 = chart_data.sma_20_points();
        let sma_50 = chart_data.sma_50_points();
        let (lo, hi) = chart_data.value_bounds().unwrap_or((0.0, 1.0));
        let pad = ((hi - lo) * 0.05).max(0.01);
        let x_max = closes.len().saturating_sub(1).max(1) as f64;

        let datasets = vec![
            Dataset::default()
                .name("Close")
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(Color::White))
                .data(&closes),
            Dataset::default()
                .name("SMA20")
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(Color::Yellow))
                .data(&sma_20),
            Dataset::default()
                .name("SMA50")
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(Color::Magenta))
                .data(&sma_50),
        ];

        let chart = Chart::new(datasets)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!("{} as of {}", selected.ticker, selected.as_of)),
            )
            .x_axis(Axis::default().bounds([0.0, x_max]))
            .y_axis(
                Axis::default()
                    .bounds([lo - pad, hi + pad])
                    .labels(vec![
                        Span::raw(format!("{:.0}", lo)),
                        Span::raw(format!("{:.0}", hi)),
                    ]),
            );

        frame.render_widget(chart, area);
    }

    fn render_skipped(&self, frame: &mut Frame, area: Rect, state: &DashboardState<'_>) {
        let lines: Vec<Line> = state
            .report
            .skipped
            .iter()
            .take(4)
            .map(|s| Line::from(format!("{}: {}", s.ticker, s.reason)))
            .collect();

        let title = format!("Skipped ({})", state.report.skipped.len());
        let paragraph = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(title));
        frame.render_widget(paragraph, area);
    }
}

fn opt(value: Option<f64>, precision: usize) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:.*}", precision, v))
}
