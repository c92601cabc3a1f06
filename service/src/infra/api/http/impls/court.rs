//! [`Court`]-related [`Api`] implementations.

use common::operations::{By, Select};
use tracerr::Traced;

use crate::{
    domain::Court,
    infra::{api, Api},
};

use super::super::Http;

impl Api<Select<By<Vec<Court>, ()>>> for Http {
    type Ok = Vec<Court>;
    type Err = Traced<api::Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<Court>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.get("courts").await.map_err(tracerr::wrap!())
    }
}
