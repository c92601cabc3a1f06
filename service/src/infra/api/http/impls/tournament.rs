//! [`Tournament`]-related [`Api`] implementations.

use common::operations::{By, Delete, Insert, Select};
use reqwest::Method;
use tracerr::Traced;

use crate::{
    domain::{
        tournament::{self, registration},
        Registration, Tournament,
    },
    infra::{
        api::{self, Mine, Next},
        Api,
    },
};

use super::super::Http;

impl Api<Select<By<Vec<Tournament>, ()>>> for Http {
    type Ok = Vec<Tournament>;
    type Err = Traced<api::Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<Tournament>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.get("tournaments").await.map_err(tracerr::wrap!())
    }
}

impl Api<Select<By<Tournament, tournament::Id>>> for Http {
    type Ok = Tournament;
    type Err = Traced<api::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Tournament, tournament::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.get(&format!("tournaments/{}", by.into_inner()))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl Api<Select<By<Tournament, Next>>> for Http {
    type Ok = Tournament;
    type Err = Traced<api::Error>;

    async fn execute(
        &self,
        _: Select<By<Tournament, Next>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.get("tournaments/next").await.map_err(tracerr::wrap!())
    }
}

impl Api<Select<By<Vec<Registration>, Mine>>> for Http {
    type Ok = Vec<Registration>;
    type Err = Traced<api::Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<Registration>, Mine>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.get("tournament-registrations/my-registrations")
            .await
            .map_err(tracerr::wrap!())
    }
}

impl Api<Select<By<Vec<Registration>, tournament::Id>>> for Http {
    type Ok = Vec<Registration>;
    type Err = Traced<api::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Registration>, tournament::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.get(&format!(
            "tournament-registrations/tournament/{}",
            by.into_inner(),
        ))
        .await
        .map_err(tracerr::wrap!())
    }
}

impl Api<Insert<registration::New>> for Http {
    type Ok = Registration;
    type Err = Traced<api::Error>;

    async fn execute(
        &self,
        Insert(new): Insert<registration::New>,
    ) -> Result<Self::Ok, Self::Err> {
        self.submit(Method::POST, "tournament-registrations", &new)
            .await
            .map_err(tracerr::wrap!())
    }
}

impl Api<Delete<registration::Id>> for Http {
    type Ok = ();
    type Err = Traced<api::Error>;

    async fn execute(
        &self,
        Delete(id): Delete<registration::Id>,
    ) -> Result<Self::Ok, Self::Err> {
        self.delete(&format!("tournament-registrations/{id}"))
            .await
            .map_err(tracerr::wrap!())
    }
}
