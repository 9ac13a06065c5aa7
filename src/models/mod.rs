pub mod assignment;
pub mod course;
pub mod enrollment;
pub mod grade;
pub mod message;
pub mod report;
pub mod submission;
pub mod user;

pub use assignment::{Assignment, NewAssignmentRequest};
pub use course::{Course, CourseCreatedResponse, CourseListing, NewCourseRequest};
pub use enrollment::{EnrollRequest, Enrollment};
pub use grade::{
    EnrolledStudent, Grade, GradeEntry, GradeStudentRequest, GradeSubmissionRequest,
    GradeSummary, StudentGrade,
};
pub use message::MessageResponse;
pub use report::ExportRequest;
pub use submission::{NewSubmission, StudentSubmission, Submission, SubmissionDetail};
pub use user::{LoginRequest, LoginResponse, RegisterRequest, User, ROLE_STUDENT, ROLE_TEACHER};
