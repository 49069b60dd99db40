use crate::graph::{Error, Graph};
use ortserver_entity::{issue, ort_run_issue};
use ortserver_model::runs::OrtIssue;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use tracing::instrument;

impl Graph {
    /// Look up an issue by its content, inserting it if it is not known yet.
    #[instrument(skip(self, connection), err(level=tracing::Level::INFO))]
    pub async fn get_or_put_issue<C: ConnectionTrait>(
        &self,
        issue: &OrtIssue,
        connection: &C,
    ) -> Result<issue::Model, Error> {
        let mut select = issue::Entity::find()
            .filter(issue::Column::Timestamp.eq(issue.timestamp))
            .filter(issue::Column::Source.eq(&issue.source))
            .filter(issue::Column::Message.eq(&issue.message))
            .filter(issue::Column::Severity.eq(issue.severity.as_str()));

        select = match &issue.affected_path {
            Some(path) => select.filter(issue::Column::AffectedPath.eq(path)),
            None => select.filter(issue::Column::AffectedPath.is_null()),
        };

        if let Some(found) = select.one(connection).await? {
            return Ok(found);
        }

        Ok(issue::ActiveModel {
            id: Default::default(),
            timestamp: Set(issue.timestamp),
            source: Set(issue.source.clone()),
            message: Set(issue.message.clone()),
            severity: Set(issue.severity.as_str().to_string()),
            affected_path: Set(issue.affected_path.clone()),
        }
        .insert(connection)
        .await?)
    }

    /// Attach issues to an ORT run, keeping their identifier and worker.
    #[instrument(skip(self, issues, connection), fields(issues = issues.len()), err)]
    pub async fn add_run_issues<C: ConnectionTrait>(
        &self,
        ort_run_id: i64,
        issues: &[OrtIssue],
        connection: &C,
    ) -> Result<(), Error> {
        for issue in issues {
            let stored = self.get_or_put_issue(issue, connection).await?;
            let identifier_id = match &issue.identifier {
                Some(identifier) => Some(self.get_or_put_identifier(identifier, connection).await?.id),
                None => None,
            };

            ort_run_issue::ActiveModel {
                id: Default::default(),
                ort_run_id: Set(ort_run_id),
                issue_id: Set(stored.id),
                identifier_id: Set(identifier_id),
                worker: Set(issue.worker.clone()),
            }
            .insert(connection)
            .await?;
        }

        Ok(())
    }

    /// All issues of an ORT run, optionally restricted to the ones reported by a worker.
    pub async fn get_run_issues<C: ConnectionTrait>(
        &self,
        ort_run_id: i64,
        worker: Option<&str>,
        connection: &C,
    ) -> Result<Vec<OrtIssue>, Error> {
        let mut select = ort_run_issue::Entity::find()
            .filter(ort_run_issue::Column::OrtRunId.eq(ort_run_id))
            .order_by_asc(ort_run_issue::Column::Id);

        if let Some(worker) = worker {
            select = select.filter(ort_run_issue::Column::Worker.eq(worker));
        }

        let mut result = Vec::new();
        for link in select.all(connection).await? {
            result.push(self.load_run_issue(link, connection).await?);
        }

        Ok(result)
    }

    /// Resolve the issue an ORT run links to, with the identifier and worker of the link.
    pub async fn load_run_issue<C: ConnectionTrait>(
        &self,
        link: ort_run_issue::Model,
        connection: &C,
    ) -> Result<OrtIssue, Error> {
        let issue = issue::Entity::find_by_id(link.issue_id)
            .one(connection)
            .await?
            .ok_or_else(|| Error::NotFound(format!("issue {}", link.issue_id)))?;

        let mut issue = OrtIssue::try_from(issue)?;
        if let Some(identifier_id) = link.identifier_id {
            issue.identifier = Some(self.load_identifier(identifier_id, connection).await?);
        }
        issue.worker = link.worker;

        Ok(issue)
    }
}
