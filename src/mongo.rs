use async_trait::async_trait;
use mongodb::{
    Client, Database,
    bson::{Bson, Document, doc},
};

use crate::{
    config::{COLLECTION_NAME, DB_NAME},
    error::AppResult,
    store::{ConnectionFactory, ReplicaConnection, RequestRecord, ServerIdentity},
};

/// Opens short-lived [`mongodb::Client`] connections bound to the demo
/// database. Driver defaults apply for all timeouts.
#[derive(Debug, Clone, Copy, Default)]
pub struct MongoFactory;

#[async_trait]
impl ConnectionFactory for MongoFactory {
    async fn connect(&self, endpoint: &str) -> AppResult<Box<dyn ReplicaConnection>> {
        let client = Client::with_uri_str(endpoint).await?;
        Ok(Box::new(MongoConnection { client }))
    }
}

struct MongoConnection {
    client: Client,
}

impl MongoConnection {
    fn database(&self) -> Database {
        self.client.database(DB_NAME)
    }

    fn collection(&self) -> mongodb::Collection<Document> {
        self.database().collection::<Document>(COLLECTION_NAME)
    }
}

#[async_trait]
impl ReplicaConnection for MongoConnection {
    async fn ping(&self) -> AppResult<()> {
        self.database().run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }

    async fn identity(&self) -> AppResult<ServerIdentity> {
        let status = self
            .database()
            .run_command(doc! { "serverStatus": 1 })
            .await?;

        let host = status.get_str("host").ok().map(String::from);
        // mongod reports pid as a BSON number; the width varies by version.
        let pid = match status.get("pid") {
            Some(Bson::Int32(pid)) => Some(i64::from(*pid)),
            Some(Bson::Int64(pid)) => Some(*pid),
            Some(Bson::Double(pid)) => Some(*pid as i64),
            _ => None,
        };

        Ok(ServerIdentity { host, pid })
    }

    async fn insert_record(&self, record: &RequestRecord) -> AppResult<String> {
        let result = self
            .collection()
            .insert_one(doc! {
                "host": &record.host,
                "pid": record.pid,
                "node": &record.node,
            })
            .await?;

        Ok(match result.inserted_id {
            Bson::ObjectId(oid) => oid.to_hex(),
            other => other.to_string(),
        })
    }

    async fn count_records(&self) -> AppResult<u64> {
        Ok(self.collection().count_documents(doc! {}).await?)
    }
}
