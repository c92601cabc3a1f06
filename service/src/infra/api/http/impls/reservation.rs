//! [`Reservation`]-related [`Api`] implementations.

use common::operations::{By, Delete, Insert, Select, Update};
use reqwest::Method;
use tracerr::Traced;

use crate::{
    domain::{reservation, Reservation},
    infra::{
        api::{self, Mine},
        Api,
    },
};

use super::super::Http;

impl Api<Select<By<Vec<Reservation>, ()>>> for Http {
    type Ok = Vec<Reservation>;
    type Err = Traced<api::Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<Reservation>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.get("reservations").await.map_err(tracerr::wrap!())
    }
}

impl Api<Select<By<Vec<Reservation>, Mine>>> for Http {
    type Ok = Vec<Reservation>;
    type Err = Traced<api::Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<Reservation>, Mine>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.get("reservations/me").await.map_err(tracerr::wrap!())
    }
}

impl Api<Insert<reservation::New>> for Http {
    type Ok = Reservation;
    type Err = Traced<api::Error>;

    async fn execute(
        &self,
        Insert(new): Insert<reservation::New>,
    ) -> Result<Self::Ok, Self::Err> {
        self.submit(Method::POST, "reservations", &new)
            .await
            .map_err(tracerr::wrap!())
    }
}

impl Api<Update<reservation::Change>> for Http {
    type Ok = Reservation;
    type Err = Traced<api::Error>;

    async fn execute(
        &self,
        Update(change): Update<reservation::Change>,
    ) -> Result<Self::Ok, Self::Err> {
        self.submit(Method::PUT, &format!("reservations/{}", change.id), &change)
            .await
            .map_err(tracerr::wrap!())
    }
}

impl Api<Delete<reservation::Id>> for Http {
    type Ok = ();
    type Err = Traced<api::Error>;

    async fn execute(
        &self,
        Delete(id): Delete<reservation::Id>,
    ) -> Result<Self::Ok, Self::Err> {
        self.delete(&format!("reservations/{id}"))
            .await
            .map_err(tracerr::wrap!())
    }
}
