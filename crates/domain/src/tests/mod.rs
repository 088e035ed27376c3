// Copyright (C) 2026 CALC Data Capture Developers
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

mod tsquery;
mod types;
