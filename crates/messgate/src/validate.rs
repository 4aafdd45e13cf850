//! Local checks on login input, run before anything touches the network.

use messgate_session::SessionError;

/// Checks that both fields are present and the email looks like
/// `local@domain`.
///
/// This is deliberately shallow. The gateway is the authority on whether
/// an address exists; this only catches input that can't possibly be
/// right, so we don't spend a round trip on it.
pub(crate) fn validate_credentials(
    email: &str,
    password: &str,
) -> Result<(), SessionError> {
    if email.is_empty() {
        return Err(invalid("email is required"));
    }
    if password.is_empty() {
        return Err(invalid("password is required"));
    }
    if email.chars().any(char::is_whitespace) {
        return Err(invalid("email must not contain spaces"));
    }

    // `split_once` splits at the first '@'. A second '@' ends up in the
    // domain half and is caught below.
    let Some((local, domain)) = email.split_once('@') else {
        return Err(invalid("email must contain '@'"));
    };
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return Err(invalid("email must look like name@domain"));
    }
    Ok(())
}

fn invalid(message: &str) -> SessionError {
    SessionError::Validation(message.to_string())
}
