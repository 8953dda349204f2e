//! Message keys carried by errors.
//!
//! Every client-facing error is tagged with a stable key so that clients can
//! render their own translations. The server ships English defaults only.

pub const NOT_VALID: &str = "message.not.valid";
pub const BAD_REQUEST: &str = "message.bad.request";
pub const INTERNAL_ERROR: &str = "message.internal.error";

pub const AUTH_REQUIRED: &str = "message.auth.required";
pub const AUTH_INVALID_CREDENTIALS: &str = "message.auth.invalid.credentials";
pub const AUTH_INVALID_TOKEN: &str = "message.auth.invalid.token";

pub const TAG_NOT_FOUND: &str = "message.tag.not.found";
pub const TAG_EXISTS: &str = "message.tag.exists";
pub const TAG_NAME_NOT_VALID: &str = "message.tag.name.not.valid";
pub const POPULAR_TAG_NOT_FOUND: &str = "message.tag.popular.not.found";

pub const CERTIFICATE_NOT_FOUND: &str = "message.certificate.not.found";
pub const CERTIFICATE_IN_USE: &str = "message.certificate.in.use";
pub const CERTIFICATE_DUPLICATE_TAGS: &str = "message.certificate.duplicate.tags";

pub const USER_NOT_FOUND: &str = "message.user.not.found";
pub const USER_FORBIDDEN: &str = "message.user.forbidden";
pub const USER_EXISTS: &str = "message.user.exists";

pub const ORDER_NOT_FOUND: &str = "message.order.not.found";

pub const ACCESS_DENIED: &str = "message.access.denied";

/// English text for a message key.
pub fn resolve(key: &str) -> &'static str {
    match key {
        NOT_VALID => "The submitted data is not valid",
        BAD_REQUEST => "The request could not be read",
        INTERNAL_ERROR => "An internal error occurred",
        AUTH_REQUIRED => "Authentication required",
        AUTH_INVALID_CREDENTIALS => "Invalid username or password",
        AUTH_INVALID_TOKEN => "Invalid or expired token",
        TAG_NOT_FOUND => "Tag with the given id was not found",
        TAG_EXISTS => "A tag with this name already exists",
        TAG_NAME_NOT_VALID => "Tag name is not valid",
        POPULAR_TAG_NOT_FOUND => "No orders have been placed yet",
        CERTIFICATE_NOT_FOUND => "Certificate with the given id was not found",
        CERTIFICATE_IN_USE => "Certificate has orders and cannot be deleted",
        CERTIFICATE_DUPLICATE_TAGS => "Certificate tags must not repeat",
        USER_NOT_FOUND => "User was not found",
        USER_FORBIDDEN => "You may only access your own account",
        USER_EXISTS => "A user with this username or email already exists",
        ORDER_NOT_FOUND => "Order was not found",
        ACCESS_DENIED => "Access denied",
        _ => "Unknown error",
    }
}
