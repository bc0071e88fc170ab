//! GPIO assignments for the bell-tower main board.
//!
//! One servo signal line per bell, in bell order. The numbers follow
//! the NodeMCU D5–D10 header so the board drops onto the original
//! tower wiring loom unchanged.

use crate::bells::BELL_COUNT;

/// Servo signal GPIO per bell (bell 0 first).
pub const BELL_SERVO_GPIOS: [u8; BELL_COUNT] = [14, 12, 13, 15, 5, 4];
