//! Sign-in, registration and session queries.

use tracing::{debug, info, instrument, warn};

use crate::Result;
use crate::auth::{LoginCredentials, Registration};
use crate::error::{AuthError, Error, InvalidInputError};
use crate::http::{ApiClient, ApiRequest, Transport, endpoints};
use crate::models::{AuthResponse, ProtectedData, TokenValidation, User};

/// Authentication endpoints.
pub struct AuthApi<'a, T> {
    client: &'a ApiClient<T>,
}

impl<'a, T: Transport> AuthApi<'a, T> {
    pub(crate) fn new(client: &'a ApiClient<T>) -> Self {
        Self { client }
    }

    /// Sign in and store the issued credential pair.
    ///
    /// # Errors
    ///
    /// A wrong username or password comes back as a protocol error; it never
    /// triggers a token refresh.
    #[instrument(skip(self, credentials), fields(username = %credentials.username()))]
    pub async fn sign_in(&self, credentials: &LoginCredentials) -> Result<AuthResponse> {
        info!("Signing in");

        let request = ApiRequest::post(endpoints::SIGN_IN)
            .anonymous()
            .json(credentials)?;
        let response: AuthResponse = self.client.send_json(request).await?;
        self.client.set_tokens(&response.tokens)?;

        debug!(user_id = %response.user.id, "Signed in");
        Ok(response)
    }

    /// Create an account and store the issued credential pair.
    #[instrument(skip(self, registration), fields(username = %registration.username))]
    pub async fn sign_up(&self, registration: &Registration) -> Result<AuthResponse> {
        if !registration.passwords_match() {
            return Err(InvalidInputError::Other {
                message: "password confirmation does not match".to_string(),
            }
            .into());
        }

        info!("Registering account");

        let request = ApiRequest::post(endpoints::SIGN_UP)
            .anonymous()
            .json(registration)?;
        let response: AuthResponse = self.client.send_json(request).await?;
        self.client.set_tokens(&response.tokens)?;

        debug!(user_id = %response.user.id, "Registered");
        Ok(response)
    }

    /// Ask the backend whether the stored access token is still valid.
    ///
    /// The token travels in the `token` query parameter. A `valid: false`
    /// answer or a failed check ends the session: stored credentials are
    /// wiped and `LoggedOut` is emitted.
    #[instrument(skip(self))]
    pub async fn validate(&self) -> Result<TokenValidation> {
        let request = ApiRequest::post(endpoints::VALIDATE)
            .token_query_param(endpoints::VALIDATE_TOKEN_PARAM);
        match self.client.send_json::<TokenValidation>(request).await {
            Ok(validation) if validation.valid => Ok(validation),
            Ok(validation) => {
                warn!("Access token reported invalid");
                self.client.expire_session(AuthError::TokenInvalid);
                Ok(validation)
            }
            // A failed refresh has already ended the session.
            Err(err @ Error::Auth(_)) => Err(err),
            Err(err) => {
                warn!(error = %err, "Token validation failed");
                self.client.expire_session(AuthError::TokenInvalid);
                Err(err)
            }
        }
    }

    /// Profile of the signed-in user.
    #[instrument(skip(self))]
    pub async fn info(&self) -> Result<User> {
        self.client.send_json(ApiRequest::get(endpoints::INFO)).await
    }

    #[instrument(skip(self))]
    pub async fn protected_data(&self) -> Result<ProtectedData> {
        self.client
            .send_json(ApiRequest::get(endpoints::PROTECTED))
            .await
    }

    /// Forget the stored credentials.
    pub fn logout(&self) -> Result<()> {
        self.client.logout()
    }
}
