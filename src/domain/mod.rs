//! DB に依存しない業務ルール。
//! Django でいう `utils.py` や モデルの純粋メソッドに相当します。

pub mod asignacion;
pub mod calendar;
pub mod formato;
pub mod ids;
pub mod nivel;
pub mod progreso;
pub mod tipos;
