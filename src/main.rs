mod config;
mod engine;
mod error;
mod field;
mod physics;
mod proximity;
mod render;
mod style;

use std::io::ErrorKind;
use std::time::Duration;

use iced::canvas::{Cache, Canvas, Cursor, Frame, Geometry, Path, Stroke};
use iced::time;
use iced::window;
use iced::{
    Application, Clipboard, Color, Command, Container, Element, Length, Point, Rectangle,
    Settings, Subscription,
};
use iced_native::event;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use crate::config::{Palette, Rgba, SimulationConfig};
use crate::engine::{Engine, Lifecycle};
use crate::error::ConfigError;
use crate::field::Viewport;
use crate::render::{DisplayList, Surface};

const CONFIG_PATH: &str = "background.json";
const FRAME_INTERVAL: Duration = Duration::from_millis(16);
const INITIAL_SIZE: (u32, u32) = (1280, 800);
const GLOW_RINGS: usize = 4;

#[derive(Clone, Debug, PartialEq)]
enum Message {
    Tick,
    ConfigLoaded(SimulationConfig),
    PointerMoved(Point),
    PointerPressed,
    Resized(Viewport),
    CloseRequested,
}

struct Plexus {
    engine: Engine,
    viewport: Viewport,
    field: Field,
}

impl Application for Plexus {
    type Executor = iced::executor::Default;
    type Message = Message;
    type Flags = ();

    fn new(_flags: Self::Flags) -> (Self, Command<Message>) {
        let palette = Palette::default();
        // iced 0.3 does not report the window's initial size, only later
        // `Resized` events, so start from the size the window was opened with
        let (width, height) = INITIAL_SIZE;
        (
            Self {
                engine: Engine::new(SimulationConfig::default(), palette),
                viewport: Viewport::new(width, height),
                field: Field::new(palette.background),
            },
            Command::perform(SimulationConfig::load(CONFIG_PATH), |result| match result {
                Ok(config) => Message::ConfigLoaded(config),
                Err(ConfigError::Io(err)) if err.kind() == ErrorKind::NotFound => {
                    info!("no {} found, using defaults", CONFIG_PATH);
                    Message::ConfigLoaded(SimulationConfig::default())
                }
                Err(err) => {
                    warn!(%err, "ignoring {}, using defaults", CONFIG_PATH);
                    Message::ConfigLoaded(SimulationConfig::default())
                }
            }),
        )
    }

    fn title(&self) -> String {
        String::from("Plexus")
    }

    fn subscription(&self) -> Subscription<Message> {
        match self.engine.lifecycle() {
            Lifecycle::Disposed => Subscription::none(),
            Lifecycle::Uninitialized => iced_native::subscription::events_with(host_event),
            Lifecycle::Running => Subscription::batch(vec![
                time::every(FRAME_INTERVAL).map(|_| Message::Tick),
                iced_native::subscription::events_with(host_event),
            ]),
        }
    }

    fn update(&mut self, message: Self::Message, _clipboard: &mut Clipboard) -> Command<Message> {
        match message {
            Message::Tick => {
                if self.engine.tick(Some(&mut self.field.display)) {
                    self.field.cache.clear();
                }
            }
            Message::ConfigLoaded(config) => {
                if self.engine.lifecycle() == Lifecycle::Uninitialized {
                    self.engine = Engine::new(config, *self.engine.palette());
                    if let Err(err) = self.engine.start(self.viewport) {
                        warn!(%err, "particle field did not start");
                    }
                }
            }
            Message::PointerMoved(position) => {
                self.engine.pointer_moved(position.x, position.y);
            }
            Message::PointerPressed => {
                self.engine.pointer_pressed();
            }
            Message::Resized(viewport) => {
                self.viewport = viewport;
                self.engine.resized(viewport);
                self.field.cache.clear();
            }
            Message::CloseRequested => {
                self.engine.dispose();
            }
        }
        Command::none()
    }

    fn should_exit(&self) -> bool {
        self.engine.lifecycle() == Lifecycle::Disposed
    }

    fn view(&mut self) -> Element<'_, Message> {
        let background = to_color(self.field.background);
        Container::new(
            Canvas::new(&mut self.field)
                .width(Length::Fill)
                .height(Length::Fill),
        )
        .width(Length::Fill)
        .height(Length::Fill)
        .style(style::Container { background })
        .into()
    }
}

fn host_event(event: iced_native::Event, _status: event::Status) -> Option<Message> {
    use iced_native::{mouse, window, Event};

    match event {
        Event::Mouse(mouse::Event::CursorMoved { position }) => {
            Some(Message::PointerMoved(position))
        }
        Event::Mouse(mouse::Event::ButtonPressed(_)) => Some(Message::PointerPressed),
        Event::Window(window::Event::Resized { width, height }) => {
            Some(Message::Resized(Viewport::new(width, height)))
        }
        Event::Window(window::Event::CloseRequested) => Some(Message::CloseRequested),
        _ => None,
    }
}

/// The canvas layer. Holds the last frame produced by the engine and
/// replays it whenever iced asks for geometry.
struct Field {
    display: DisplayList,
    background: Rgba,
    cache: Cache,
}

impl Field {
    fn new(background: Rgba) -> Self {
        Self {
            display: DisplayList::default(),
            background,
            cache: Cache::default(),
        }
    }
}

impl iced::canvas::Program<Message> for Field {
    fn draw(&self, bounds: Rectangle, _cursor: Cursor) -> Vec<Geometry> {
        let geometry = self.cache.draw(bounds.size(), |frame| {
            self.display.replay(&mut FrameSurface {
                frame,
                background: self.background,
            });
        });

        vec![geometry]
    }
}

struct FrameSurface<'a> {
    frame: &'a mut Frame,
    background: Rgba,
}

impl Surface for FrameSurface<'_> {
    fn clear(&mut self) {
        let background = Path::rectangle(Point::ORIGIN, self.frame.size());
        self.frame.fill(&background, to_color(self.background));
    }

    fn fill_glow_circle(&mut self, x: f32, y: f32, radius: f32, color: Rgba, blur: f32) {
        let center = Point::new(x, y);

        // soft halo, outermost ring first
        for ring in (1..=GLOW_RINGS).rev() {
            let t = ring as f32 / GLOW_RINGS as f32;
            let halo = Path::circle(center, radius + blur * t * 0.5);
            let alpha = color.a * 0.25 * (1.0 - t * 0.8);
            self.frame.fill(&halo, to_color(color.with_alpha(alpha)));
        }

        self.frame.fill(&Path::circle(center, radius), to_color(color));
    }

    fn line(&mut self, from: (f32, f32), to: (f32, f32), color: Rgba, width: f32) {
        let path = Path::line(Point::new(from.0, from.1), Point::new(to.0, to.1));
        self.frame.stroke(
            &path,
            Stroke {
                color: to_color(color),
                width,
                ..Stroke::default()
            },
        );
    }
}

fn to_color(rgba: Rgba) -> Color {
    Color::from_rgba(rgba.r, rgba.g, rgba.b, rgba.a)
}

fn main() -> iced::Result {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("failed to install logger: {}", err);
    }

    info!("Plexus v{}", env!("CARGO_PKG_VERSION"));

    let (width, height) = INITIAL_SIZE;
    Plexus::run(Settings {
        antialiasing: true,
        exit_on_close_request: false,
        window: window::Settings {
            size: (width, height),
            ..window::Settings::default()
        },
        ..Settings::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use iced_native::{mouse, window, Event};

    fn map(event: Event) -> Option<Message> {
        host_event(event, event::Status::Ignored)
    }

    #[test]
    fn cursor_motion_moves_pointer() {
        let position = Point::new(12.0, 34.0);
        assert_eq!(
            map(Event::Mouse(mouse::Event::CursorMoved { position })),
            Some(Message::PointerMoved(position))
        );
    }

    #[test]
    fn any_button_press_is_a_pointer_press() {
        for button in [mouse::Button::Left, mouse::Button::Right, mouse::Button::Middle]
            .iter()
            .copied()
        {
            assert_eq!(
                map(Event::Mouse(mouse::Event::ButtonPressed(button))),
                Some(Message::PointerPressed)
            );
        }
    }

    #[test]
    fn window_events_resize_and_close() {
        assert_eq!(
            map(Event::Window(window::Event::Resized {
                width: 700,
                height: 500
            })),
            Some(Message::Resized(Viewport::new(700, 500)))
        );
        assert_eq!(
            map(Event::Window(window::Event::CloseRequested)),
            Some(Message::CloseRequested)
        );
    }

    #[test]
    fn unrelated_events_are_dropped() {
        assert_eq!(map(Event::Mouse(mouse::Event::CursorEntered)), None);
        assert_eq!(
            map(Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left))),
            None
        );
    }
}
