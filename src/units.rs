#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct Width(pub usize);
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct Height(pub usize);

/// Side length of one square grid cell in world pixels.
#[derive(PartialEq, PartialOrd, Copy, Clone, Debug)]
pub struct CellSize(pub f32);

impl CellSize {
    #[inline]
    pub fn half(&self) -> f32 {
        self.0 / 2.0
    }
}
