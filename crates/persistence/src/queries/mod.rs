// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only queries.
//!
//! - `counters` - the highest code sequence issued per period
//! - `guard` - the active monthly mission check
//! - `missions` - mission loading and code listing
//! - `reference` - employee, location and transport lookups

pub mod counters;
pub mod guard;
pub mod missions;
pub mod reference;
