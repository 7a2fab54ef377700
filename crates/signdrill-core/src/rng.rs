// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

/// A minimal, zero-dependency, completely insecure PRNG for picking words.
pub struct TinyRng {
    state: u64,
}

const A: u64 = 6364136223846793005;
const C: u64 = 1442695040888963407;

impl TinyRng {
    pub fn from_seed(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Seeds the generator from the system clock.
    pub fn from_clock() -> Self {
        use std::time::SystemTime;
        use std::time::UNIX_EPOCH;

        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0);
        Self::from_seed(seed)
    }

    pub fn next_u32(&mut self) -> u32 {
        let new = self.state.wrapping_mul(A).wrapping_add(C);
        self.state = new;
        (new >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        let hi = self.next_u32() as u64;
        let lo = self.next_u32() as u64;
        (hi << 32) | lo
    }

    /// Picks a number in `[0, max)` with equal probability, or `None` when
    /// `max` is zero. Draws past the largest multiple of `max` are thrown
    /// away so that small values are not favoured.
    pub fn below(&mut self, max: u64) -> Option<u64> {
        if max == 0 {
            return None;
        }
        let zone = u64::MAX - (u64::MAX % max);
        loop {
            let x = self.next_u64();
            if x < zone {
                return Some(x % max);
            }
        }
    }
}
