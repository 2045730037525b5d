mod summary;
pub use self::summary::ProjectSummary;

mod project;
pub use self::project::{
    Award, DemoVideo, Engagement, GalleryImage, ProjectDetails, TeamMember, Technology, VideoKind,
};
