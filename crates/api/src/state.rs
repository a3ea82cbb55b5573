use mongodb::Database;
use reelhub_config::Settings;
use reelhub_services::{
    AuthService, InviteService, Mailer,
    dao::{
        comment::CommentDao, folder::FolderDao, invite::InviteDao,
        notification::NotificationDao, user::UserDao, video::VideoDao,
        workspace::WorkspaceDao,
    },
};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub settings: Settings,
    pub auth: Arc<AuthService>,
    pub users: Arc<UserDao>,
    pub workspaces: Arc<WorkspaceDao>,
    pub folders: Arc<FolderDao>,
    pub videos: Arc<VideoDao>,
    pub comments: Arc<CommentDao>,
    pub notifications: Arc<NotificationDao>,
    pub invites: Arc<InviteService>,
}

impl AppState {
    pub fn new(db: Database, settings: Settings, mailer: Arc<dyn Mailer>) -> Self {
        let auth = Arc::new(AuthService::new(&settings.identity));
        let users = Arc::new(UserDao::new(&db));
        let workspaces = Arc::new(WorkspaceDao::new(&db));
        let folders = Arc::new(FolderDao::new(&db));
        let videos = Arc::new(VideoDao::new(&db));
        let comments = Arc::new(CommentDao::new(&db));
        let notifications = Arc::new(NotificationDao::new(&db));
        let invites = Arc::new(InviteService::new(
            users.clone(),
            workspaces.clone(),
            Arc::new(InviteDao::new(&db)),
            notifications.clone(),
            mailer,
            settings.app.public_url.clone(),
        ));

        Self {
            db,
            settings,
            auth,
            users,
            workspaces,
            folders,
            videos,
            comments,
            notifications,
            invites,
        }
    }
}
