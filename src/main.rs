// Tripboard - trip itinerary board
// Main entry point for iced application

use std::time::Duration;

use iced::widget::{column, container, row, scrollable, text};
use iced::{Application, Command, Element, Length, Settings as IcedSettings, Subscription, Theme};
use log::{error, info};

use tripboard::app::TripApp;
use tripboard::config::{validate_config, Config};
use tripboard::error::AppResult;
use tripboard::models::EventType;
use tripboard::store::{seed, TripData};
use tripboard::ui::styles::{BackgroundStyle, HeaderStyle, ZEN_DESTRUCTIVE, ZEN_SUBTEXT, ZEN_TEXT};
use tripboard::ui::{self, ShellMessage};
use tripboard::ui_state::UiState;
use tripboard::utils::logging::{init_logging, log_app_error};

/// How often the animation clock advances while a shake is running.
const TICK_INTERVAL: Duration = Duration::from_millis(50);

pub struct TripboardShell {
    app: TripApp,
    ui_state: UiState,
}

impl TripboardShell {
    /// Records the outcome of one board operation on the status line.
    fn report(&mut self, result: AppResult<()>) {
        if let Err(e) = result {
            log_app_error(&e, "board");
            self.ui_state.set_error(e.to_status_string());
        }
    }
}

impl Application for TripboardShell {
    type Message = ShellMessage;
    type Theme = Theme;
    type Executor = iced::executor::Default;
    type Flags = (Config, EventType);

    fn new((config, default_type): Self::Flags) -> (Self, Command<ShellMessage>) {
        let mut shell = TripboardShell {
            app: TripApp::new(default_type),
            ui_state: UiState::new(),
        };
        let started = shell.app.start();
        shell.report(started);

        let load = Command::perform(seed::load(config), |result| {
            ShellMessage::Loaded(result.map_err(|e| {
                log_app_error(&e, "load");
                e.to_status_string()
            }))
        });
        (shell, load)
    }

    fn title(&self) -> String {
        "Tripboard".to_string()
    }

    fn update(&mut self, message: ShellMessage) -> Command<ShellMessage> {
        let result = match message {
            ShellMessage::Click(node) => self.app.click(node),
            ShellMessage::Input(node, value) => self.app.input(node, &value),
            ShellMessage::Key(key) => self.app.key(&key),
            ShellMessage::Filter(filter) => {
                self.ui_state.filter = filter;
                self.app.set_filter(filter)
            }
            ShellMessage::Tick(now) => {
                let elapsed = self.ui_state.elapsed_since_tick(now);
                let result = self.app.advance(elapsed);
                if self.app.doc().pending_timers() == 0 {
                    self.ui_state.stop_ticking();
                }
                result
            }
            ShellMessage::Loaded(Ok(data)) => {
                self.ui_state.loading = false;
                self.ui_state.set_status(format!("{} events", data.events.len()));
                self.app.load(data)
            }
            ShellMessage::Loaded(Err(status)) => {
                error!("Starting with an empty trip: {}", status);
                self.ui_state.loading = false;
                self.ui_state.set_error(status);
                self.app.load(TripData::default())
            }
        };
        self.report(result);
        Command::none()
    }

    fn subscription(&self) -> Subscription<ShellMessage> {
        let keys = iced::keyboard::on_key_press(|key, _modifiers| match key {
            iced::keyboard::Key::Named(iced::keyboard::key::Named::Escape) => {
                Some(ShellMessage::Key("Escape".to_string()))
            }
            _ => None,
        });

        if self.app.doc().pending_timers() > 0 {
            Subscription::batch([keys, iced::time::every(TICK_INTERVAL).map(ShellMessage::Tick)])
        } else {
            keys
        }
    }

    fn view(&self) -> Element<'_, ShellMessage> {
        let doc = self.app.doc();

        let header = container(
            row![
                text("Tripboard").size(22).style(iced::theme::Text::Color(ZEN_TEXT)),
                ui::filter_bar(self.ui_state.filter),
                ui::render_node(doc, self.app.header()),
            ]
            .spacing(24)
            .align_items(iced::Alignment::Center),
        )
        .padding(16)
        .width(Length::Fill)
        .style(iced::theme::Container::Custom(Box::new(HeaderStyle)));

        let status_color = if self.ui_state.has_error {
            ZEN_DESTRUCTIVE
        } else {
            ZEN_SUBTEXT
        };

        let content = column![
            header,
            scrollable(container(ui::render_node(doc, self.app.content())).padding(16).width(Length::Fill))
                .height(Length::Fill),
            ui::status_line(&self.ui_state.status, status_color),
        ];

        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .style(iced::theme::Container::Custom(Box::new(BackgroundStyle)))
            .into()
    }

    fn theme(&self) -> Theme {
        Theme::Light
    }
}

fn main() -> iced::Result {
    if let Err(e) = init_logging() {
        eprintln!("Failed to initialize logging: {}", e);
    }

    info!("Starting Tripboard");

    let config = Config::from_env();
    let default_type = match validate_config(&config).and_then(|_| config.default_event_type()) {
        Ok(default_type) => default_type,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            eprintln!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    TripboardShell::run(IcedSettings {
        flags: (config, default_type),
        window: iced::window::Settings {
            size: iced::Size::new(960.0, 720.0),
            resizable: true,
            ..Default::default()
        },
        id: None,
        fonts: vec![],
        default_font: Default::default(),
        default_text_size: iced::Pixels(16.0),
        antialiasing: false,
    })
}
