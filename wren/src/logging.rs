use core::fmt;

use wren_msg::Message;

/// One-line description of a message, for use in log macros
///
/// ```text
/// Request: Con 0.01 id 12 token [a1, 09] with 2 options, 0 byte payload
/// ```
pub(crate) struct Summary<'a, 'b>(pub(crate) &'a Message<'b>);

impl<'a, 'b> fmt::Display for Summary<'a, 'b> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let msg = self.0;
    write!(f,
           "{:?}: {:?} {} id {} token {:02x?} with {} options, {} byte payload",
           msg.code.kind(),
           msg.ty,
           msg.code,
           msg.id,
           msg.token.as_bytes(),
           msg.options_present().len(),
           msg.payload().map(|p| p.len()).unwrap_or(0))
  }
}
