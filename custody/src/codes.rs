//! Defining the diagnostics error codes.

/// A name that is not bound in any visible scope.
pub const UNBOUND_NAME_ERROR: &str = "E0001";
/// A binding that clashes with a binding of an enclosing scope, or a value that
/// is not fresh.
pub const DUPLICATE_BINDING_ERROR: &str = "E0002";
/// A binding used after its value was moved away.
pub const USE_AFTER_MOVE_ERROR: &str = "E0003";
/// A binding used after its value was dropped.
pub const USE_AFTER_DROP_ERROR: &str = "E0004";
/// A value moved (or dropped) while borrowed.
pub const MOVE_WHILE_BORROWED_ERROR: &str = "E0005";
/// Exclusive access requested while the value is already borrowed.
pub const MUTABLE_BORROW_CONFLICT_ERROR: &str = "E0006";
/// Shared access requested while the value is mutably borrowed.
pub const SHARED_BORROW_CONFLICT_ERROR: &str = "E0007";
/// A borrow ended twice.
pub const DOUBLE_RELEASE_ERROR: &str = "E0008";
/// A value dropped twice.
pub const DOUBLE_DROP_ERROR: &str = "E0009";
/// A borrow bounded by a scope that outlives the borrowed value.
pub const BORROW_OUTLIVES_VALUE_ERROR: &str = "E0010";
/// Scopes not closed in the reverse order of their opening.
pub const SCOPE_ORDER_ERROR: &str = "E0100";
/// Reference to a scope, borrow or value that does not exist.
pub const MALFORMED_REFERENCE_ERROR: &str = "E0101";
