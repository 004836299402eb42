// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Write operations.
//!
//! - `counters` - raising the issued code counters
//! - `missions` - mission creation, edits, deletion and restore
//! - `reference` - employee inserts and location/transport upserts

pub mod counters;
pub mod missions;
pub mod reference;
