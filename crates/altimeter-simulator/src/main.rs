//! Desktop simulator for the altimeter screen.
//!
//! Renders the altimeter page in an SDL2 window via
//! `embedded-graphics-simulator`, fed by a simulated barometer so the sensor
//! lifecycle and the color transitions can be exercised without a phone.
//!
//! # Key bindings
//!
//! | Key    | Action                                        |
//! |--------|-----------------------------------------------|
//! | Space  | Hide / show the screen (unsubscribe / resubscribe) |
//! | Q, Esc | Quit                                          |
//!
//! # Environment
//!
//! Read from the process environment, or from a `.env` file in the working
//! directory:
//!
//! | Variable                  | Values                          | Default |
//! |---------------------------|---------------------------------|---------|
//! | `ALTIMETER_SAMPLING_RATE` | `normal`, `ui`, `game`, `fastest` | `ui`    |
//! | `ALTIMETER_SCALE`         | 1 - 8                           | 2       |
//! | `ALTIMETER_PROFILE`       | `climb` or a pressure in hPa    | `climb` |
//! | `ALTIMETER_NO_SENSOR`     | `1` / `true` to hide the sensor | unset   |

mod barometer;

use std::time::{Duration, Instant};

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics_simulator::{
    OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent, Window, sdl2::Keycode,
};
use log::{error, info, warn};

use altimeter_core::config::Config;
use altimeter_core::framebuffer::FrameBuffer;
use altimeter_core::pages::{AltimeterPage, Page, screen_bounds};
use altimeter_core::sensors::{ReadingChannel, SensorReadingSource};
use altimeter_core::ui::{DISPLAY_HEIGHT_PX, DISPLAY_WIDTH_PX};

use barometer::{PressureProfile, SimulatedBarometer};

/// Target frame duration (~30 FPS).
const FRAME_DURATION: Duration = Duration::from_millis(33);

/// Channel between the simulated barometer and the screen's subscription
static READINGS: ReadingChannel = ReadingChannel::new();

/// Settings that only exist on the simulator
struct SimulatorSettings {
    config: Config,
    profile: PressureProfile,
    sensor_present: bool,
}

/// Build the configuration from the environment, falling back to defaults
/// for anything missing or invalid.
fn load_settings() -> SimulatorSettings {
    let mut config = Config::default();

    if let Ok(value) = std::env::var("ALTIMETER_SAMPLING_RATE") {
        match value.parse() {
            Ok(rate) => config.sensor.sampling_rate = rate,
            Err(e) => warn!("ALTIMETER_SAMPLING_RATE={:?}: {}", value, e),
        }
    }

    if let Ok(value) = std::env::var("ALTIMETER_SCALE") {
        match value.trim().parse::<u32>() {
            Ok(scale) => {
                if let Err(e) = config.display.set_scale(scale) {
                    warn!("ALTIMETER_SCALE={}: {}", scale, e);
                }
            }
            Err(e) => warn!("ALTIMETER_SCALE={:?}: {}", value, e),
        }
    }

    let profile = match std::env::var("ALTIMETER_PROFILE") {
        Ok(value) => PressureProfile::parse(&value).unwrap_or_else(|| {
            warn!("ALTIMETER_PROFILE={:?}: expected `climb` or hPa", value);
            PressureProfile::Climb
        }),
        Err(_) => PressureProfile::Climb,
    };

    let sensor_present = !std::env::var("ALTIMETER_NO_SENSOR")
        .map(|value| matches!(value.trim(), "1" | "true" | "yes"))
        .unwrap_or(false);

    SimulatorSettings {
        config,
        profile,
        sensor_present,
    }
}

/// Why a screen loop ended
enum ScreenExit {
    /// Space pressed: hide a visible screen or show a hidden one
    Toggle,
    Quit,
}

/// Window-side state shared by the visible and hidden loops
struct Host {
    frame: FrameBuffer,
    display: SimulatorDisplay<Rgb565>,
    window: Window,
}

impl Host {
    fn present(&mut self) {
        if let Err(e) = self.frame.flush(&mut self.display) {
            error!("Flush error: {:?}", e);
        }
        self.window.update(&self.display);
    }

    /// Poll window events, mapping them to a screen exit if any.
    fn poll(&mut self) -> Option<ScreenExit> {
        for event in self.window.events() {
            match event {
                SimulatorEvent::Quit => return Some(ScreenExit::Quit),
                SimulatorEvent::KeyDown { keycode, .. } => match keycode {
                    Keycode::Q | Keycode::Escape => return Some(ScreenExit::Quit),
                    Keycode::Space => return Some(ScreenExit::Toggle),
                    _ => {}
                },
                _ => {}
            }
        }
        None
    }
}

/// Sleep for the remainder of the frame and return the frame's length.
fn pace(frame_start: Instant) -> Duration {
    let elapsed = frame_start.elapsed();
    if elapsed < FRAME_DURATION {
        std::thread::sleep(FRAME_DURATION - elapsed);
    }
    frame_start.elapsed()
}

/// Show the altimeter page for one subscription.
///
/// The subscription is opened on entry and released when this function
/// returns, however the loop ends.
fn run_visible(
    source: &mut SensorReadingSource<'static, SimulatedBarometer<'static>>,
    page: &mut Box<AltimeterPage>,
    host: &mut Host,
) -> ScreenExit {
    let mut subscription = source.start();
    page.attach(&subscription);
    info!(
        "Screen visible (sensor {})",
        if subscription.sensor_available() {
            "present"
        } else {
            "absent"
        }
    );

    let mut dt = Duration::ZERO;
    let exit = loop {
        let frame_start = Instant::now();

        if let Some(exit) = host.poll() {
            break exit;
        }

        subscription.platform_mut().tick(dt);
        page.pump(&mut subscription);
        Page::update(&mut *page);

        if Page::is_dirty(&*page) {
            if let Err(e) = Page::draw_page(&mut *page, &mut host.frame) {
                error!("Draw error: {:?}", e);
            }
            Page::mark_clean(&mut *page);
        }
        host.present();

        dt = pace(frame_start);
    };

    Page::on_deactivate(&mut *page);
    subscription.stop();
    info!("Screen hidden");
    exit
}

/// Blank screen while the altimeter is not visible.
///
/// The simulated sensor keeps its clock running but delivers nothing.
fn run_hidden(
    source: &mut SensorReadingSource<'static, SimulatedBarometer<'static>>,
    host: &mut Host,
) -> ScreenExit {
    if let Err(e) = host.frame.clear(Rgb565::BLACK) {
        error!("Clear error: {:?}", e);
    }

    let mut dt = Duration::ZERO;
    loop {
        let frame_start = Instant::now();

        if let Some(exit) = host.poll() {
            return exit;
        }

        source.platform_mut().tick(dt);
        host.present();
        dt = pace(frame_start);
    }
}

fn main() {
    // Load `.env` first so it can also set RUST_LOG
    let dotenv_path = dotenvy::dotenv().ok();
    env_logger::init();
    info!("Starting altimeter simulator");
    if let Some(path) = dotenv_path {
        info!("Loaded environment from {}", path.display());
    }

    let settings = load_settings();
    let config = settings.config;
    info!(
        "Display: {}×{} (scale {}×), sampling rate: {}, profile: {:?}, sensor present: {}",
        DISPLAY_WIDTH_PX,
        DISPLAY_HEIGHT_PX,
        config.display.scale,
        config.sensor.sampling_rate.label(),
        settings.profile,
        settings.sensor_present
    );
    info!("Keys: Space=Hide/Show  Q=Quit");

    let size = screen_bounds().size;
    let output_settings = OutputSettingsBuilder::new()
        .scale(config.display.scale)
        .build();

    let mut host = Host {
        frame: FrameBuffer::new(size),
        display: SimulatorDisplay::<Rgb565>::new(size),
        window: Window::new("Altimeter Simulator", &output_settings),
    };

    // The SDL window is lazily initialized on the first `update()` call.
    // We must call `update()` once before `events()` or it will panic.
    host.window.update(&host.display);

    let barometer = SimulatedBarometer::new(settings.profile, settings.sensor_present);
    let mut source = SensorReadingSource::new(barometer, &READINGS, config.sensor.sampling_rate);
    let mut page = Box::new(AltimeterPage::new(screen_bounds()));

    loop {
        if let ScreenExit::Quit = run_visible(&mut source, &mut page, &mut host) {
            break;
        }
        if let ScreenExit::Quit = run_hidden(&mut source, &mut host) {
            break;
        }
    }

    info!("Simulator exiting");
}
