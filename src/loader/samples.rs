//! Built-in sample documents substituted when a page's document cannot be
//! loaded and the page's recovery policy keeps it demonstrable.

pub const ACHIEVEMENTS: &str = r##"{
  "achievements": [
    {
      "id": 1,
      "category": "competition",
      "name": "National Robotics Championship 2023",
      "year": 2023,
      "achievement": "1st Place Overall",
      "description": "Secured first position in autonomous robotics category.",
      "brief_description": "Won national robotics championship",
      "thumbnail": "",
      "timeline": true,
      "featured": true,
      "team_members": ["Rahul Sharma", "Priya Singh", "Amit Kumar"],
      "details": {
        "competition_name": "National Robotics Championship 2023",
        "organizer": "IIT Bombay",
        "location": "Mumbai, India",
        "prize": "Rs 1,00,000 + Trophy",
        "highlights": ["Built autonomous robot", "Implemented computer vision"],
        "technologies": ["ROS", "Python", "OpenCV"]
      }
    },
    {
      "id": 2,
      "category": "research",
      "name": "AI-Powered Agricultural Robot",
      "year": 2022,
      "achievement": "Research Paper Published",
      "description": "Published research paper in IEEE Journal.",
      "brief_description": "Published IEEE paper on agricultural robotics",
      "thumbnail": "",
      "team_members": ["Dr. A. K. Sharma", "Vikram Reddy"],
      "details": {
        "journal_name": "IEEE Transactions on Robotics",
        "impact_factor": 6.8,
        "highlights": ["Developed ML model", "Created autonomous navigation"],
        "technologies": ["TensorFlow", "ROS", "Python"]
      }
    }
  ]
}"##;

pub const NEWS: &str = r##"{
  "clubNews": [
    {
      "id": 1,
      "title": "Welcome to Robotics Club News",
      "type": "announcement",
      "date": "2024-01-15",
      "summary": "Welcome to our new news portal! This is sample data. Place your actual news in data/news.json",
      "content": "This is sample club news data. In production, this will load from your JSON file.",
      "author": "Admin",
      "important": true,
      "tags": ["welcome", "announcement"]
    },
    {
      "id": 2,
      "title": "Weekly Meeting Summary",
      "type": "meeting",
      "date": "2024-01-14",
      "summary": "Discussed upcoming projects and assigned team leads for ROBOCON 2024 preparations.",
      "content": "Meeting covered project timelines, resource allocation, and training schedules.",
      "author": "Secretary",
      "important": false,
      "tags": ["meeting", "robocon", "planning"]
    }
  ],
  "industryNews": [
    {
      "id": 101,
      "title": "Latest Advancements in Robotics AI",
      "source": "Robotics Today",
      "date": "2024-01-12",
      "summary": "New AI algorithms are making robots more autonomous and capable than ever before.",
      "content": "Recent breakthroughs in machine learning are enabling robots to perform complex tasks with minimal human intervention.",
      "readMoreLink": "#",
      "category": "ai-ml",
      "tags": ["ai", "machine-learning", "autonomous"]
    },
    {
      "id": 102,
      "title": "Open Source Robotics Tools",
      "source": "Open Robotics",
      "date": "2024-01-10",
      "summary": "New open-source tools are making robotics more accessible to students and researchers.",
      "content": "Community-driven projects are lowering the barrier to entry for robotics development.",
      "readMoreLink": "#",
      "category": "software",
      "tags": ["open-source", "tools", "development"]
    }
  ]
}"##;

pub const PROJECTS: &str = r##"{
  "projects": [
    {
      "id": 1,
      "title": "Autonomous Delivery Drone",
      "year": 2024,
      "type": "drone",
      "shortDescription": "AI-powered autonomous drone for last-mile delivery",
      "longDescription": "An autonomous delivery drone system with obstacle avoidance and real-time tracking capabilities.",
      "thumbnail": "",
      "images": [],
      "technologies": ["Python", "ROS", "OpenCV"],
      "tools": ["DJI SDK", "Gazebo"],
      "team": ["Rajesh Kumar", "Priya Sharma"],
      "achievements": ["1st Prize - National Competition"],
      "github": "#",
      "demo": "#",
      "status": "completed",
      "duration": "6 months"
    },
    {
      "id": 2,
      "title": "Humanoid Robot",
      "year": 2023,
      "type": "humanoid",
      "shortDescription": "Advanced humanoid robot with 20 degrees of freedom",
      "longDescription": "A bipedal humanoid robot capable of walking and object recognition.",
      "thumbnail": "",
      "images": [],
      "technologies": ["C++", "ROS2", "PyTorch"],
      "tools": ["SolidWorks", "3D Printer"],
      "team": ["Vikram Singh", "Anjali Verma"],
      "achievements": ["Finalist - ROBOCON India"],
      "github": "#",
      "demo": "#",
      "status": "completed",
      "duration": "8 months"
    }
  ]
}"##;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_samples_parse() {
        for doc in [ACHIEVEMENTS, NEWS, PROJECTS] {
            let v: serde_json::Value = serde_json::from_str(doc).unwrap();
            assert!(v.is_object());
        }
    }

    #[test]
    fn test_samples_keep_hash_links() {
        let news: serde_json::Value = serde_json::from_str(NEWS).unwrap();
        assert_eq!(news["industryNews"].as_array().unwrap().len(), 2);
        assert_eq!(news["industryNews"][1]["readMoreLink"], "#");

        let projects: serde_json::Value = serde_json::from_str(PROJECTS).unwrap();
        assert_eq!(projects["projects"][1]["github"], "#");
        assert_eq!(projects["projects"][1]["title"], "Humanoid Robot");
    }
}
