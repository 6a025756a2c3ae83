//! Row-oriented read/write access shared by the float maps and binary masks.

pub trait ImageView {
    type Pixel: Copy;

    fn width(&self) -> usize;
    fn height(&self) -> usize;
    fn stride(&self) -> usize;

    fn row(&self, y: usize) -> &[Self::Pixel];

    /// `true` when both views describe grids of identical shape.
    fn same_shape<O: ImageView>(&self, other: &O) -> bool
    where
        Self: Sized,
    {
        self.width() == other.width() && self.height() == other.height()
    }
}

pub trait ImageViewMut: ImageView {
    fn row_mut(&mut self, y: usize) -> &mut [Self::Pixel];
}

