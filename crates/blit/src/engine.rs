//! Blit Engine Module
//!
//! This module owns the window, the event loop and the video driver:
//! - Engine construction via [`EngineBuilder`]
//! - Event loop ownership through [`EngineRunner`]
//! - Application drawing via the [`Scene2D`] trait
//!
//! # Key Concepts
//!
//! ## Deferred device creation
//! The window and the [`WgpuDriver`] are only created once winit reports
//! `resumed`. Android does not allow a render surface before that, and it
//! takes the surface away again on `suspended`. A [`Scene2D`] therefore gets
//! [`Scene2D::setup`] called every time a driver is created.
//!
//! ## Loop policies
//! [`LoopPolicy::Desktop`] polls continuously and draws while the window is
//! active. [`LoopPolicy::Mobile`] blocks for events until the app gains focus
//! and only animates while focused.

use std::sync::Arc;

use derivative::Derivative;
use winit::{
        application::ApplicationHandler,
        dpi::PhysicalSize,
        event::{ElementState, KeyEvent, WindowEvent},
        event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
        keyboard::{KeyCode, PhysicalKey},
        window::{Window, WindowId},
};

use crate::{
        driver_choice::DriverType,
        input::MotionTracker,
        lifecycle::{AppLifecycle, LifecycleAction, LifecycleCommand},
        timer::Timer,
        video::{Dimension, Position, VideoDriver, wgpu_driver::WgpuDriver},
};

/// Per-frame input handed to [`Scene2D::draw`].
pub struct FrameContext<'a>
{
        pub driver: &'a mut dyn VideoDriver,

        /// Milliseconds since the first video driver was created.
        pub time_ms: u32,

        /// Last known mouse position, desktop only.
        pub cursor: Option<Position>,
}

/// Application logic driven by the [`Engine`].
pub trait Scene2D
{
        /// Loads resources. Called after every video driver creation.
        fn setup(
                &mut self,
                driver: &mut dyn VideoDriver,
        ) -> anyhow::Result<()>;

        /// Issues one frame, scene bracket included.
        fn draw(
                &mut self,
                frame: &mut FrameContext<'_>,
        ) -> anyhow::Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoopPolicy
{
        #[default]
        Desktop,
        Mobile,
}

impl LoopPolicy
{
        /// Desktop draws while the window is active, mobile additionally
        /// needs the animating flag.
        pub fn allows_frame(
                self,
                focused: bool,
                occluded: bool,
                has_driver: bool,
                lifecycle: &AppLifecycle,
        ) -> bool
        {
                let active = focused && !occluded && has_driver;

                match self
                {
                        LoopPolicy::Desktop => active,
                        LoopPolicy::Mobile => active && lifecycle.should_draw(),
                }
        }
}

/// Runner for the [`Engine`].
#[derive(Debug)]
pub struct EngineRunner<S: Scene2D>
{
        pub engine: Option<Engine<S>>,

        pub event_loop: EventLoop<()>,
}

impl<S: Scene2D> EngineRunner<S>
{
        /// Constructor for [`EngineRunner`].
        ///
        /// Most importantly, it creates the `event_loop` from
        /// `winit::EventLoop`.
        pub fn new(engine: Engine<S>) -> anyhow::Result<Self>
        {
                let event_loop = EventLoop::new()?;

                Ok(Self {
                        engine: Some(engine),
                        event_loop,
                })
        }

        /// Same as [`EngineRunner::new`], bound to the Android activity.
        #[cfg(target_os = "android")]
        pub fn with_android_app(
                engine: Engine<S>,
                app: winit::platform::android::activity::AndroidApp,
        ) -> anyhow::Result<Self>
        {
                use winit::platform::android::EventLoopBuilderExtAndroid;

                let event_loop = EventLoop::builder().with_android_app(app).build()?;

                Ok(Self {
                        engine: Some(engine),
                        event_loop,
                })
        }

        /// Executes the `run_app()` function of `winit::EventLoop`.
        ///
        /// # Returns
        ///
        /// The event loop error, or the error that stopped the [`Engine`],
        /// e.g. a video driver that could not be created.
        pub fn run(self) -> anyhow::Result<()>
        {
                let mut engine = match self.engine
                {
                        Some(e) => e,
                        None => anyhow::bail!("Engine doesn't exist."),
                };

                self.event_loop.run_app(&mut engine)?;

                match engine.error.take()
                {
                        Some(e) => Err(e),
                        None => Ok(()),
                }
        }
}

/// Owns the window, the video driver and the [`Scene2D`].
///
/// To construct [`Engine`], use [`EngineBuilder`].
#[derive(Derivative)]
#[derivative(Debug(bound = ""))]
pub struct Engine<S: Scene2D>
{
        pub driver_type: DriverType,

        pub window_size: Dimension,

        pub title: String,

        pub policy: LoopPolicy,

        #[derivative(Debug = "ignore")]
        pub scene: S,

        // --- Core Context ---
        /// The OS window for rendering and input handling.
        #[derivative(Debug = "ignore")]
        pub window: Option<Arc<Window>>,

        pub driver: Option<WgpuDriver>,

        // --- Timing ---
        pub timer: Option<Timer>,

        // --- Input ---
        pub lifecycle: AppLifecycle,

        pub motion: MotionTracker,

        pub cursor: Option<Position>,

        pub focused: bool,

        pub occluded: bool,

        /// Fatal error that ended the event loop.
        pub error: Option<anyhow::Error>,
}

impl<S: Scene2D> Engine<S>
{
        pub fn should_draw(&self) -> bool
        {
                self.policy.allows_frame(
                        self.focused,
                        self.occluded,
                        self.driver.is_some(),
                        &self.lifecycle,
                )
        }

        pub fn render(&mut self) -> anyhow::Result<()>
        {
                let driver = match self.driver.as_mut()
                {
                        None =>
                        {
                                anyhow::bail!("Video driver doesn't exist.");
                        }
                        Some(d) => d,
                };

                let time_ms = self.timer.as_ref().map_or(0, Timer::time);

                let cursor = match self.policy
                {
                        LoopPolicy::Desktop => self.cursor,
                        LoopPolicy::Mobile => None,
                };

                let mut frame = FrameContext {
                        driver,
                        time_ms,
                        cursor,
                };

                self.scene.draw(&mut frame)
        }

        fn window_attributes(&self) -> winit::window::WindowAttributes
        {
                let attributes = Window::default_attributes().with_title(self.title.as_str());

                match self.policy
                {
                        LoopPolicy::Desktop => attributes.with_inner_size(PhysicalSize::new(
                                self.window_size.width,
                                self.window_size.height,
                        )),
                        // The activity decides the size.
                        LoopPolicy::Mobile => attributes,
                }
        }

        fn create_device(
                &mut self,
                event_loop: &ActiveEventLoop,
        ) -> anyhow::Result<()>
        {
                let window = match self.window.as_ref()
                {
                        Some(w) => w.clone(),
                        None =>
                        {
                                let w = Arc::new(event_loop.create_window(self.window_attributes())?);

                                self.window = Some(w.clone());

                                w
                        }
                };

                // Native builds can block on async state initialization.
                let mut driver = pollster::block_on(WgpuDriver::new(window.clone(), self.driver_type))?;

                log::info!("Created {} video driver", self.driver_type);

                self.scene.setup(&mut driver)?;

                if self.timer.is_none()
                {
                        self.timer = Some(Timer::new());
                }

                self.driver = Some(driver);

                if self.policy == LoopPolicy::Desktop
                {
                        self.focused = true;
                }

                window.request_redraw();

                Ok(())
        }

        fn apply(
                &mut self,
                event_loop: &ActiveEventLoop,
                command: LifecycleCommand,
        )
        {
                match self.lifecycle.handle(command)
                {
                        LifecycleAction::CreateDevice =>
                        {
                                if let Err(e) = self.create_device(event_loop)
                                {
                                        log::error!("Could not create selected driver: {e:#}");

                                        self.lifecycle.has_device = false;
                                        self.error = Some(e);

                                        event_loop.exit();
                                }
                        }
                        LifecycleAction::ReleaseDevice =>
                        {
                                log::info!("Releasing video driver");

                                self.driver = None;
                        }
                        LifecycleAction::Exit =>
                        {
                                self.driver = None;
                                self.window = None;
                        }
                        LifecycleAction::None => (),
                }
        }
}

impl<S: Scene2D> ApplicationHandler for Engine<S>
{
        fn resumed(
                &mut self,
                event_loop: &ActiveEventLoop,
        )
        {
                // From the winit docs:
                //
                // It’s recommended that applications should only initialize their
                // graphics context and create a window after they have received their first
                // Resumed event. Some systems (specifically Android) won’t allow applications
                // to create a render surface until they are resumed.
                self.apply(event_loop, LifecycleCommand::InitWindow);
        }

        fn suspended(
                &mut self,
                event_loop: &ActiveEventLoop,
        )
        {
                self.apply(event_loop, LifecycleCommand::TermWindow);
        }

        fn window_event(
                &mut self,
                event_loop: &ActiveEventLoop,
                _id: WindowId,
                event: WindowEvent,
        )
        {
                match event
                {
                        WindowEvent::CloseRequested =>
                        {
                                log::info!("The close button was pressed; stopping");
                                event_loop.exit();
                        }
                        WindowEvent::Focused(focused) =>
                        {
                                self.focused = focused;

                                let command = if focused
                                {
                                        LifecycleCommand::GainedFocus
                                }
                                else
                                {
                                        LifecycleCommand::LostFocus
                                };

                                self.apply(event_loop, command);
                        }
                        WindowEvent::Occluded(occluded) =>
                        {
                                self.occluded = occluded;
                        }
                        WindowEvent::Resized(size) =>
                        {
                                if let Some(driver) = self.driver.as_mut()
                                {
                                        driver.resize(Dimension::new(size.width, size.height));
                                }
                        }
                        WindowEvent::CursorMoved {
                                position, ..
                        } =>
                        {
                                self.cursor = Some(Position::new(position.x as i32, position.y as i32));
                        }
                        WindowEvent::Touch(touch) =>
                        {
                                self.motion.on_touch(&touch);
                        }
                        WindowEvent::RedrawRequested =>
                        {
                                if !self.should_draw()
                                {
                                        return;
                                }

                                let start = instant::Instant::now();

                                match self.render()
                                {
                                        Ok(_) =>
                                        {
                                                let duration = start.elapsed();

                                                log::trace!(
                                                        "Render frame took: {:.2} ms",
                                                        duration.as_secs_f64() * 1000.0
                                                );
                                        }
                                        Err(e) =>
                                        {
                                                log::error!("Unable to render {e:#}");
                                        }
                                }
                        }
                        WindowEvent::KeyboardInput {
                                event:
                                        KeyEvent {
                                                physical_key: PhysicalKey::Code(KeyCode::Escape),
                                                state: ElementState::Pressed,
                                                ..
                                        },
                                ..
                        } =>
                        {
                                event_loop.exit();
                        }
                        _ => (),
                }
        }

        fn about_to_wait(
                &mut self,
                event_loop: &ActiveEventLoop,
        )
        {
                let control_flow = match self.policy
                {
                        LoopPolicy::Desktop => ControlFlow::Poll,
                        LoopPolicy::Mobile => self.lifecycle.control_flow(),
                };

                event_loop.set_control_flow(control_flow);

                if self.should_draw()
                {
                        if let Some(window) = self.window.as_ref()
                        {
                                window.request_redraw();
                        }
                }
                else if self.policy == LoopPolicy::Desktop
                {
                        std::thread::yield_now();
                }
        }

        fn exiting(
                &mut self,
                event_loop: &ActiveEventLoop,
        )
        {
                self.apply(event_loop, LifecycleCommand::Destroy);
        }
}

/// A builder for the engine.
///
/// # Important
///
/// [`EngineBuilder::build`] does **not** create a window or a video driver.
/// Both are created when the event loop reaches
/// [`ApplicationHandler::resumed`].
#[derive(Debug)]
pub struct EngineBuilder<S: Scene2D>
{
        engine: Engine<S>,
}

impl<S: Scene2D> EngineBuilder<S>
{
        pub fn new(scene: S) -> Self
        {
                Self {
                        engine: Engine {
                                driver_type: DriverType::platform_default(),
                                window_size: Dimension::new(512, 384),
                                title: String::from("blit"),
                                policy: LoopPolicy::Desktop,
                                scene,
                                window: None,
                                driver: None,
                                timer: None,
                                lifecycle: AppLifecycle::new(),
                                motion: MotionTracker::new(),
                                cursor: None,
                                focused: false,
                                occluded: false,
                                error: None,
                        },
                }
        }

        pub fn with_driver(
                mut self,
                driver_type: DriverType,
        ) -> Self
        {
                self.engine.driver_type = driver_type;
                self
        }

        pub fn with_window_size(
                mut self,
                size: Dimension,
        ) -> Self
        {
                self.engine.window_size = size;
                self
        }

        pub fn with_title(
                mut self,
                title: &str,
        ) -> Self
        {
                self.engine.title = title.to_owned();
                self
        }

        pub fn with_loop_policy(
                mut self,
                policy: LoopPolicy,
        ) -> Self
        {
                self.engine.policy = policy;
                self
        }

        /// Finally builds the [`Engine`].
        pub fn build(self) -> anyhow::Result<Engine<S>>
        {
                let size = self.engine.window_size;

                if size.width == 0 || size.height == 0
                {
                        anyhow::bail!("Window size {}x{} is empty.", size.width, size.height);
                }

                Ok(self.engine)
        }
}
