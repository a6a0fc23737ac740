// CRUNCHBOX — style-biased prompt structuring for image synthesis
// Copyright (c) 2026 Lushy | CRUNCHBOX
//
// Turns a free-text creative prompt into an ordered, weighted prompt skeleton
// biased toward one of seven fixed aesthetic categories, plus a matching
// negative prompt. No rendering happens here; the output feeds a downstream
// image synthesizer.

pub mod catalog;
pub mod error;
pub mod server;
pub mod styler;
