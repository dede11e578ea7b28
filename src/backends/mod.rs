//! Backends serve as the "targets" for the document tree produced upstream. Currently
//! the backends include:
//!
//! - OpenOffice.org 1.0 Writer markup (the `content.xml` body of an `.sxw` document,
//!   plus the picture manifest entries the packaging step needs)
//!

pub mod openoffice;
