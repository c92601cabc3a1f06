//! Authentication-related [`Api`] implementations.

use common::operations::{Insert, Perform, Update};
use reqwest::Method;
use secrecy::ExposeSecret as _;
use serde_json::json;
use tracerr::Traced;

use crate::{
    domain::User,
    infra::{
        api::{self, Authenticated, Authorization, Credentials, GoogleCredential, SignUp},
        Api,
    },
};

use super::super::Http;

impl Api<Perform<Credentials>> for Http {
    type Ok = Authenticated;
    type Err = Traced<api::Error>;

    async fn execute(
        &self,
        Perform(creds): Perform<Credentials>,
    ) -> Result<Self::Ok, Self::Err> {
        let body = json!({
            "email": creds.email,
            "password": creds.password.expose_secret().as_ref(),
        });
        self.submit(Method::POST, "auth/login", &body)
            .await
            .map_err(tracerr::wrap!())
    }
}

impl Api<Perform<GoogleCredential>> for Http {
    type Ok = Authenticated;
    type Err = Traced<api::Error>;

    async fn execute(
        &self,
        Perform(credential): Perform<GoogleCredential>,
    ) -> Result<Self::Ok, Self::Err> {
        self.submit(Method::POST, "auth/google", &credential)
            .await
            .map_err(tracerr::wrap!())
    }
}

impl Api<Insert<SignUp>> for Http {
    type Ok = User;
    type Err = Traced<api::Error>;

    async fn execute(
        &self,
        Insert(sign_up): Insert<SignUp>,
    ) -> Result<Self::Ok, Self::Err> {
        let body = json!({
            "name": sign_up.name,
            "email": sign_up.email,
            "password": sign_up.password.expose_secret().as_ref(),
        });
        self.submit(Method::POST, "auth/register", &body)
            .await
            .map_err(tracerr::wrap!())
    }
}

impl Api<Update<Authorization>> for Http {
    type Ok = ();
    type Err = Traced<api::Error>;

    async fn execute(
        &self,
        Update(Authorization(token)): Update<Authorization>,
    ) -> Result<Self::Ok, Self::Err> {
        self.authorize(token).await;
        Ok(())
    }
}
