//! [`User`]-related [`Api`] implementations.

use common::operations::{By, Select};
use tracerr::Traced;

use crate::{
    domain::{user, User},
    infra::{
        api::{self, Mine},
        Api,
    },
};

use super::super::Http;

impl Api<Select<By<User, user::Id>>> for Http {
    type Ok = User;
    type Err = Traced<api::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<User, user::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.get(&format!("users/{}", by.into_inner()))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl Api<Select<By<User, Mine>>> for Http {
    type Ok = User;
    type Err = Traced<api::Error>;

    async fn execute(
        &self,
        _: Select<By<User, Mine>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.get("users/me").await.map_err(tracerr::wrap!())
    }
}
