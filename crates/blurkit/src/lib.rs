#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

#[doc(inline)]
pub use blurkit_image as image;

#[doc(inline)]
pub use blurkit_imgproc as imgproc;

#[doc(inline)]
pub use blurkit_io as io;
