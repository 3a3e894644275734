//! Mobile application lifecycle.
//!
//! The platform reports window and focus changes as [`LifecycleCommand`]s.
//! [`AppLifecycle`] turns them into the `animating` flag and tells the engine
//! whether the device has to be created or released.

use winit::event_loop::ControlFlow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleCommand
{
        /// The native window became available.
        InitWindow,
        /// The native window is going away.
        TermWindow,
        GainedFocus,
        LostFocus,
        Destroy,
}

/// What the engine has to do in response to a [`LifecycleCommand`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleAction
{
        CreateDevice,
        ReleaseDevice,
        Exit,
        None,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AppLifecycle
{
        pub animating: bool,
        pub has_device: bool,
}

impl AppLifecycle
{
        pub fn new() -> Self
        {
                Self::default()
        }

        pub fn handle(
                &mut self,
                command: LifecycleCommand,
        ) -> LifecycleAction
        {
                log::debug!("Lifecycle command {command:?}");

                match command
                {
                        LifecycleCommand::InitWindow =>
                        {
                                if self.has_device
                                {
                                        return LifecycleAction::None;
                                }

                                self.has_device = true;

                                LifecycleAction::CreateDevice
                        }
                        LifecycleCommand::TermWindow =>
                        {
                                self.animating = false;

                                if !self.has_device
                                {
                                        return LifecycleAction::None;
                                }

                                self.has_device = false;

                                LifecycleAction::ReleaseDevice
                        }
                        LifecycleCommand::GainedFocus =>
                        {
                                self.animating = true;

                                LifecycleAction::None
                        }
                        LifecycleCommand::LostFocus =>
                        {
                                self.animating = false;

                                LifecycleAction::None
                        }
                        LifecycleCommand::Destroy =>
                        {
                                self.animating = false;
                                self.has_device = false;

                                LifecycleAction::Exit
                        }
                }
        }

        /// Block for events while idle, spin while animating.
        pub fn control_flow(&self) -> ControlFlow
        {
                if self.animating
                {
                        ControlFlow::Poll
                }
                else
                {
                        ControlFlow::Wait
                }
        }

        pub fn should_draw(&self) -> bool
        {
                self.animating && self.has_device
        }
}
