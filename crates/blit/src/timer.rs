/// Millisecond clock started when the device is created.
#[derive(Debug, Clone, Copy)]
pub struct Timer
{
        start: instant::Instant,
}

impl Timer
{
        pub fn new() -> Self
        {
                Self {
                        start: instant::Instant::now(),
                }
        }

        /// Milliseconds since creation. Wraps after roughly 49 days.
        pub fn time(&self) -> u32
        {
                self.start.elapsed().as_millis() as u32
        }
}

impl Default for Timer
{
        fn default() -> Self
        {
                Self::new()
        }
}
